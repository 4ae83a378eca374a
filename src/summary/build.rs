use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
    daemon::storage::entities::ActivityRecord,
    summary::{
        aggregate::{aggregate, classify_apps},
        classify::Classifier,
        model::DailySummary,
        score::calculate_focus_score,
    },
    utils::time::date_to_string,
};

/// Assembles the whole daily summary from already loaded inputs.
///
/// Pure and total: the same inputs always produce the same document, and no
/// input can make it fail. Screenshot names pass through verbatim; the OCR
/// texts only contribute keywords.
pub fn build_daily_summary(
    records: &[ActivityRecord],
    ocr_texts: &[String],
    screenshots: Vec<String>,
    date: NaiveDate,
    classifier: &Classifier,
) -> DailySummary {
    let aggregation = aggregate(records, classifier);
    let (productive_apps, distraction_apps) = classify_apps(&aggregation.breakdown, classifier);
    let focus_score = calculate_focus_score(
        &productive_apps,
        &distraction_apps,
        &aggregation.breakdown,
        aggregation.total_time,
    );

    let mut keywords = BTreeSet::new();
    for text in ocr_texts {
        keywords.extend(classifier.extract_keywords(text));
    }

    DailySummary {
        date: date_to_string(date),
        total_time: aggregation.total_time,
        app_breakdown: aggregation.breakdown,
        screenshots,
        keywords: keywords.into_iter().collect(),
        focus_score,
        distraction_events: aggregation.distraction_events,
        meeting_time: aggregation.meeting_time,
        productive_apps,
        distraction_apps,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const DATE: NaiveDate = NaiveDate::from_ymd_opt(2025, 4, 22).unwrap();

    fn record(exe: &str, title: &str, duration: f64) -> ActivityRecord {
        ActivityRecord {
            timestamp: "2025-04-22T10:00:00+00:00".into(),
            exe: exe.into(),
            title: title.into(),
            duration,
        }
    }

    #[test]
    fn full_document_for_a_small_day() {
        let records = [
            record("code.exe", "main.py - Visual Studio Code", 100.),
            record("steam.exe", "Steam", 50.),
        ];
        let texts = vec!["fixing the parser module".to_string()];
        let shots = vec!["screenshot_2025-04-22_101500.png".to_string()];

        let summary =
            build_daily_summary(&records, &texts, shots.clone(), DATE, &Classifier::default());

        assert_eq!(summary.date, "2025-04-22");
        assert_eq!(summary.total_time, 150);
        assert_eq!(summary.focus_score, 66);
        assert_eq!(summary.distraction_events, 2);
        assert_eq!(summary.meeting_time, 0);
        assert_eq!(summary.productive_apps, vec!["code"]);
        assert_eq!(summary.distraction_apps, vec!["steam"]);
        assert_eq!(summary.screenshots, shots);
        assert_eq!(summary.keywords, vec!["fixing", "module", "parser"]);
        assert_eq!(summary.error, None);
    }

    #[test]
    fn empty_inputs_yield_the_empty_shape() {
        let summary = build_daily_summary(&[], &[], vec![], DATE, &Classifier::default());
        assert_eq!(summary, DailySummary::empty(DATE));
    }

    #[test]
    fn keywords_union_over_all_texts() {
        let texts = vec![
            "alpha parser".to_string(),
            "parser beta".to_string(),
            String::new(),
        ];
        let summary = build_daily_summary(&[], &texts, vec![], DATE, &Classifier::default());
        assert_eq!(summary.keywords, vec!["alpha", "beta", "parser"]);
    }

    #[test]
    fn identical_inputs_serialize_identically() {
        let records = [
            record("code.exe", "main.py - Visual Studio Code", 100.),
            record("chrome.exe", "cats - YouTube", 30.),
        ];
        let texts = vec!["tokenizer rewrite".to_string()];
        let shots = vec!["screenshot_2025-04-22_101500.png".to_string()];
        let classifier = Classifier::default();

        let first = build_daily_summary(&records, &texts, shots.clone(), DATE, &classifier);
        let second = build_daily_summary(&records, &texts, shots, DATE, &classifier);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap(),
        );
    }

    #[test]
    fn error_field_stays_out_of_serialized_healthy_summaries() {
        let summary = build_daily_summary(&[], &[], vec![], DATE, &Classifier::default());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("error"));
    }
}
