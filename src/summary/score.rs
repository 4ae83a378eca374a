use crate::summary::model::AppBreakdownEntry;

/// Derives the 0-100 focus score from the classified breakdown.
///
/// Productive seconds weigh 1.0, unclassified seconds 0.5 and distraction
/// seconds -1.0; the weighted sum is normalized by the day's total into
/// [-1, 1] and remapped linearly onto [0, 100]. An app name appearing in
/// both input sets would be counted twice, which is why classification
/// guarantees the sets are disjoint.
pub fn calculate_focus_score(
    productive_apps: &[String],
    distraction_apps: &[String],
    breakdown: &[AppBreakdownEntry],
    total_time: i64,
) -> i64 {
    if total_time <= 0 {
        return 0;
    }
    let productive_time: i64 = breakdown
        .iter()
        .filter(|e| productive_apps.contains(&e.app_name))
        .map(|e| e.time_spent)
        .sum();
    let distraction_time: i64 = breakdown
        .iter()
        .filter(|e| distraction_apps.contains(&e.app_name))
        .map(|e| e.time_spent)
        .sum();
    let neutral_time = (total_time - productive_time - distraction_time).max(0);

    let weighted = productive_time as f64 + neutral_time as f64 * 0.5 - distraction_time as f64;
    let normalized = weighted / total_time as f64;
    (((normalized + 1.) / 2. * 100.) as i64).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(app_name: &str, time_spent: i64) -> AppBreakdownEntry {
        AppBreakdownEntry {
            app_name: app_name.to_string(),
            exe_path: format!("{app_name}.exe"),
            time_spent,
            percentage: 0.,
            window_titles: vec![],
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn mixed_day_matches_hand_computed_score() {
        let breakdown = [entry("code", 100), entry("steam", 50)];
        // ((100 - 50) / 150 + 1) / 2 * 100 = 66.67, truncated
        assert_eq!(
            calculate_focus_score(&names(&["code"]), &names(&["steam"]), &breakdown, 150),
            66,
        );
    }

    #[test]
    fn empty_day_scores_zero() {
        assert_eq!(calculate_focus_score(&[], &[], &[], 0), 0);
    }

    #[test]
    fn all_productive_scores_hundred() {
        let breakdown = [entry("code", 120)];
        assert_eq!(
            calculate_focus_score(&names(&["code"]), &[], &breakdown, 120),
            100,
        );
    }

    #[test]
    fn all_distraction_scores_zero() {
        let breakdown = [entry("steam", 120)];
        assert_eq!(
            calculate_focus_score(&[], &names(&["steam"]), &breakdown, 120),
            0,
        );
    }

    #[test]
    fn all_neutral_scores_seventy_five() {
        let breakdown = [entry("mystery", 80)];
        assert_eq!(calculate_focus_score(&[], &[], &breakdown, 80), 75);
    }

    #[test]
    fn score_is_monotone_in_productive_time() {
        let distraction = names(&["steam"]);
        let productive = names(&["code"]);
        let mut previous = 0;
        for productive_time in (0..=100).step_by(10) {
            let breakdown = [
                entry("code", productive_time),
                entry("steam", 20),
                entry("mystery", 100 - productive_time),
            ];
            let score = calculate_focus_score(&productive, &distraction, &breakdown, 120);
            assert!(score >= previous, "score dropped at {productive_time}");
            previous = score;
        }
    }

    #[test]
    fn score_is_antitone_in_distraction_time() {
        let distraction = names(&["steam"]);
        let productive = names(&["code"]);
        let mut previous = 100;
        for distraction_time in (0..=100).step_by(10) {
            let breakdown = [
                entry("code", 20),
                entry("steam", distraction_time),
                entry("mystery", 100 - distraction_time),
            ];
            let score = calculate_focus_score(&productive, &distraction, &breakdown, 120);
            assert!(score <= previous, "score rose at {distraction_time}");
            previous = score;
        }
    }
}
