use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

use crate::{
    daemon::storage::record_event::WindowEvent, utils::clock::Clock, window_api::WindowManager,
};

/// Samples the foreground window on a fixed cadence and feeds the events to
/// the processing side. Sampling failures are logged and the tick skipped;
/// a window manager hiccup should not cost the rest of the day.
pub struct DataCollectionModule {
    next: mpsc::Sender<WindowEvent>,
    producer: Box<dyn WindowManager>,
    shutdown: CancellationToken,
    collection_frequency: Duration,
    time_provider: Box<dyn Clock>,
}

impl DataCollectionModule {
    pub fn new(
        next: mpsc::Sender<WindowEvent>,
        producer: Box<dyn WindowManager>,
        shutdown: CancellationToken,
        collection_frequency: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            producer,
            collection_frequency,
            time_provider,
            shutdown,
        }
    }

    fn collect_data(&mut self) -> Result<WindowEvent> {
        let window_data = self.producer.get_active_window_data()?;
        let timestamp = self.time_provider.time();

        Ok(WindowEvent {
            exe_path: window_data.exe_path,
            window_title: window_data.window_title,
            timestamp,
        })
    }

    /// Executes the collector event loop.
    pub async fn run(mut self) -> Result<()> {
        let mut collection_point = self.time_provider.instant();
        loop {
            collection_point += self.collection_frequency;

            match self.collect_data() {
                Ok(event) => {
                    let span = info_span!("Processing collected data");
                    debug!("Sending message {:?}", event);
                    self.next
                        .send(event)
                        .instrument(span)
                        .await
                        .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
                    info!("Successfully sent message")
                }
                Err(e) => {
                    error!("Encountered an error during collection {:?}", e)
                }
            }

            tokio::select! {
                // Cancelation means we stop execution of the event loop. Which means we also drop
                // the sender channel and consequently stop processing module.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(collection_point) => ()
            }
        }
    }
}
