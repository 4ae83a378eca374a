use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::utils::time::date_to_string;

/// Per-executable aggregate for one day. Apps are keyed by the raw
/// executable path; two paths to the same program stay separate entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppBreakdownEntry {
    /// Basename of the executable with a trailing `.exe` stripped.
    pub app_name: String,
    /// The raw executable path, used as the grouping key.
    pub exe_path: String,
    /// Seconds of focus, rounded to the nearest integer.
    pub time_spent: i64,
    /// Share of the day's total, rounded to 2 decimals.
    pub percentage: f64,
    /// Distinct window titles seen for the app, at most 50.
    pub window_titles: Vec<String>,
}

/// The derived document for one calendar day. Serialized to
/// `daily_summary_<date>.json` and served back verbatim, so the field
/// casing is part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub total_time: i64,
    pub app_breakdown: Vec<AppBreakdownEntry>,
    pub screenshots: Vec<String>,
    pub keywords: Vec<String>,
    pub focus_score: i64,
    /// Counts every retained activity record for the day, not only the
    /// distracting ones. Consumers rely on the historical meaning, so the
    /// name stays.
    pub distraction_events: i64,
    pub meeting_time: i64,
    pub productive_apps: Vec<String>,
    pub distraction_apps: Vec<String>,
    /// Set when the summary is a best-effort document produced after an
    /// internal failure. Absent from healthy summaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DailySummary {
    /// The well-defined shape of a day with no data.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date: date_to_string(date),
            total_time: 0,
            app_breakdown: vec![],
            screenshots: vec![],
            keywords: vec![],
            focus_score: 0,
            distraction_events: 0,
            meeting_time: 0,
            productive_apps: vec![],
            distraction_apps: vec![],
            error: None,
        }
    }
}
