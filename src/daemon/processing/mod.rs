use anyhow::Result;
use module::EventProcessor;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info};

use super::storage::record_event::WindowEvent;

pub mod focus_tracker;
pub mod module;

/// Drives an [EventProcessor] from the collection channel until the sender
/// side closes, then lets the processor finish its open state.
pub struct ProcessingModule<Processor> {
    receiver: Receiver<WindowEvent>,
    processor: Processor,
}

impl<P: EventProcessor> ProcessingModule<P> {
    pub fn new(receiver: Receiver<WindowEvent>, processor: P) -> Self {
        Self {
            receiver,
            processor,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(event) = self.receiver.recv().await {
            debug!("Processing event {:?}", event);
            match self.processor.process_next(event.clone()).await {
                Ok(_) => {
                    info!("Processed event {:?}", event)
                }
                Err(e) => {
                    error!("Error processing event {:?}: {e:?}", event)
                }
            }
        }

        let result = self.processor.finalize().await;
        self.receiver.close();
        result
    }
}
