use std::collections::{BTreeSet, HashMap};

use crate::{
    daemon::storage::entities::ActivityRecord,
    summary::{classify::Classifier, model::AppBreakdownEntry},
    utils::percentage::share_of_total,
    window_api::UNKNOWN_EXE,
};

/// Upper bound on distinct titles kept per app. The first 50 seen win;
/// later titles are dropped, not rotated in.
pub const MAX_TITLES_PER_APP: usize = 50;

/// Everything the one-pass fold over a day's records produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub total_time: i64,
    /// Count of retained records. See [crate::summary::model::DailySummary]
    /// for why the name doesn't say "retained".
    pub distraction_events: i64,
    pub meeting_time: i64,
    pub breakdown: Vec<AppBreakdownEntry>,
}

struct AppAccum {
    exe: String,
    time: f64,
    titles: Vec<String>,
}

/// Folds a day of records into totals and the per-app breakdown.
///
/// Records with non-positive duration are discarded and never counted.
/// Meeting time is judged per record, before grouping, so an app that was a
/// meeting for part of the day contributes only that part.
pub fn aggregate(records: &[ActivityRecord], classifier: &Classifier) -> Aggregation {
    let mut total = 0f64;
    let mut meeting = 0f64;
    let mut retained = 0i64;
    let mut index = HashMap::<String, usize>::new();
    let mut apps = Vec::<AppAccum>::new();

    for record in records {
        if record.duration <= 0. {
            continue;
        }
        retained += 1;
        total += record.duration;
        if classifier.is_meeting(&record.exe, &record.title) {
            meeting += record.duration;
        }

        let exe = if record.exe.is_empty() {
            UNKNOWN_EXE
        } else {
            record.exe.as_ref()
        };
        let slot = *index.entry(exe.to_string()).or_insert_with(|| {
            apps.push(AppAccum {
                exe: exe.to_string(),
                time: 0.,
                titles: vec![],
            });
            apps.len() - 1
        });
        let app = &mut apps[slot];
        app.time += record.duration;
        let title = record.title.as_ref();
        if !app.titles.iter().any(|t| t == title) && app.titles.len() < MAX_TITLES_PER_APP {
            app.titles.push(title.to_string());
        }
    }

    let mut breakdown: Vec<AppBreakdownEntry> = apps
        .into_iter()
        .map(|app| {
            let mut titles = app.titles;
            titles.sort();
            AppBreakdownEntry {
                app_name: app_name(&app.exe),
                time_spent: app.time.round() as i64,
                percentage: share_of_total(app.time, total),
                window_titles: titles,
                exe_path: app.exe,
            }
        })
        .collect();
    // Stable sort: ties keep first-seen order.
    breakdown.sort_by(|a, b| b.time_spent.cmp(&a.time_spent));

    Aggregation {
        total_time: total.round() as i64,
        distraction_events: retained,
        meeting_time: meeting.round() as i64,
        breakdown,
    }
}

/// Splits the breakdown into sorted unique productive/distraction app name
/// lists, judging each app once over its whole title set.
pub fn classify_apps(
    breakdown: &[AppBreakdownEntry],
    classifier: &Classifier,
) -> (Vec<String>, Vec<String>) {
    let mut productive = BTreeSet::new();
    let mut distraction = BTreeSet::new();
    for entry in breakdown {
        if classifier.is_productive(&entry.exe_path, &entry.window_titles) {
            productive.insert(entry.app_name.clone());
        }
        if classifier.is_distraction(&entry.exe_path, &entry.window_titles) {
            distraction.insert(entry.app_name.clone());
        }
    }
    (
        productive.into_iter().collect(),
        distraction.into_iter().collect(),
    )
}

/// Display name for an executable path. Splits on both separators since the
/// logs may come from a different platform than the reader.
pub fn app_name(exe_path: &str) -> String {
    if exe_path == UNKNOWN_EXE {
        return UNKNOWN_EXE.to_string();
    }
    let base = exe_path.rsplit(['/', '\\']).next().unwrap_or(exe_path);
    base.strip_suffix(".exe").unwrap_or(base).to_string()
}
