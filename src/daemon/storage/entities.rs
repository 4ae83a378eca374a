use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

/// One interval of continuous focus on a single window, as stored on disk.
/// The timestamp is carried as an opaque string: historical logs hold naive
/// local times and nothing downstream ever interprets the value.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct ActivityRecord {
    pub timestamp: Arc<str>,
    pub exe: Arc<str>,
    pub title: Arc<str>,
    #[serde(with = "duration_ser")]
    pub duration: f64,
}

/// Durations are whole seconds in practice but older producers wrote
/// fractional values, so reading accepts any json number and writing drops
/// the redundant `.0`.
mod duration_ser {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.fract() == 0. && duration.abs() < i64::MAX as f64 {
            serializer.serialize_i64(*duration as i64)
        } else {
            serializer.serialize_f64(*duration)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(deserializer)
    }
}

/// Parses newline-delimited json into records. A malformed line only loses
/// itself: siblings parse independently and the count of dropped lines is
/// reported back instead of an error.
pub fn parse_lines(text: &str) -> (Vec<ActivityRecord>, usize) {
    let mut records = vec![];
    let mut skipped = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ActivityRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                // Partial trailing lines happen after shutdowns.
                warn!("Skipping illegal json line {line}: {e}");
                skipped += 1;
            }
        }
    }
    (records, skipped)
}
