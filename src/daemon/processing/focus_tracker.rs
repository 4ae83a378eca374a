use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::{
    daemon::storage::{
        entities::ActivityRecord, log_store::FocusStorage, record_event::WindowEvent,
    },
    summary::service::SummaryService,
    utils::clock::Clock,
};

use super::module::EventProcessor;

/// Intervals shorter than this are window-switch noise, not focus. The
/// aggregation side would discard zero-second records anyway; skipping them
/// here keeps them out of the log entirely.
const MIN_RECORD_SECONDS: f64 = 1.;

/// Folds the stream of window samples into focus intervals.
///
/// An interval stays open while consecutive samples show the same executable
/// and title; the first differing sample closes it and appends one
/// [ActivityRecord] to the day it started in. When the closing sample
/// belongs to a newer day, the finished day's summary is computed and cached
/// so readers get it without recomputation.
pub struct FocusTracker<S> {
    storage: S,
    summaries: SummaryService<S>,
    clock: Box<dyn Clock>,
    current: Option<OpenInterval>,
}

struct OpenInterval {
    exe_path: Arc<str>,
    window_title: Arc<str>,
    started: DateTime<Utc>,
}

impl OpenInterval {
    fn day(&self) -> NaiveDate {
        self.started.date_naive()
    }

    fn close(self, end: DateTime<Utc>) -> Option<ActivityRecord> {
        let seconds = ((end - self.started).num_milliseconds() as f64 / 1000.).round();
        if seconds < MIN_RECORD_SECONDS {
            return None;
        }
        Some(ActivityRecord {
            timestamp: self.started.to_rfc3339().into(),
            exe: self.exe_path,
            title: self.window_title,
            duration: seconds,
        })
    }
}

impl From<WindowEvent> for OpenInterval {
    fn from(event: WindowEvent) -> Self {
        Self {
            exe_path: event.exe_path,
            window_title: event.window_title,
            started: event.timestamp,
        }
    }
}

impl<S: FocusStorage> FocusTracker<S> {
    pub fn new(storage: S, summaries: SummaryService<S>, clock: Box<dyn Clock>) -> Self {
        Self {
            storage,
            summaries,
            clock,
            current: None,
        }
    }

    /// Closes the open interval, if any, and returns the day it belonged to.
    async fn close_current(&mut self, end: DateTime<Utc>) -> Result<Option<NaiveDate>> {
        let Some(current) = self.current.take() else {
            return Ok(None);
        };
        let day = current.day();
        if let Some(record) = current.close(end) {
            self.storage.append_record(day, record).await?;
        }
        Ok(Some(day))
    }
}

impl<S: FocusStorage> EventProcessor for FocusTracker<S> {
    async fn process_next(&mut self, event: WindowEvent) -> Result<()> {
        match &self.current {
            // Still the same focus, the interval just grows.
            Some(current)
                if current.exe_path == event.exe_path
                    && current.window_title == event.window_title
                    && current.day() == event.timestamp.date_naive() => {}
            Some(_) => {
                let closed_day = self.close_current(event.timestamp).await?;
                if let Some(day) = closed_day {
                    if day != event.timestamp.date_naive() {
                        info!("Day rolled over, caching summary for {day}");
                        self.summaries.build_and_cache(day).await?;
                    }
                }
                self.current = Some(event.into());
            }
            None => self.current = Some(event.into()),
        }
        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        let now = self.clock.time();
        if let Some(day) = self.close_current(now).await? {
            self.summaries.build_and_cache(day).await?;
        }
        Ok(())
    }
}
