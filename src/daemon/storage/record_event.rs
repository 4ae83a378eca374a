use std::sync::Arc;

use chrono::{DateTime, Utc};

/// One foreground-window sample flowing from the collection module to the
/// processing module. Samples are not persisted; the focus tracker folds
/// runs of equal samples into [super::entities::ActivityRecord]s.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEvent {
    pub exe_path: Arc<str>,
    pub window_title: Arc<str>,
    pub timestamp: DateTime<Utc>,
}
