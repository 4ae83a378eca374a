use anyhow::Result;

use crate::daemon::storage::record_event::WindowEvent;

/// Represents an event processor. This should realistically be able to abstract over different
/// options: local interval tracking, remote forwarding.
pub trait EventProcessor {
    fn process_next(&mut self, message: WindowEvent) -> impl std::future::Future<Output = Result<()>>;

    fn finalize(&mut self) -> impl std::future::Future<Output = Result<()>>;
}
