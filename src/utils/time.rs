use chrono::NaiveDate;

/// This is the standard way of converting a date to a string in focusmon.
/// Every file in the data directory embeds it.
pub fn date_to_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Name of the activity log for a day. One json object per line.
pub fn focus_log_name(date: NaiveDate) -> String {
    format!("focus_log_{}.jsonl", date_to_string(date))
}

/// Name of the cached summary document for a day.
pub fn daily_summary_name(date: NaiveDate) -> String {
    format!("daily_summary_{}.json", date_to_string(date))
}

/// Prefix shared by screenshot images and their OCR text siblings.
pub fn screenshot_prefix(date: NaiveDate) -> String {
    format!("screenshot_{}_", date_to_string(date))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn file_names_embed_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 22).unwrap();
        assert_eq!(focus_log_name(date), "focus_log_2025-04-22.jsonl");
        assert_eq!(daily_summary_name(date), "daily_summary_2025-04-22.json");
        assert_eq!(screenshot_prefix(date), "screenshot_2025-04-22_");
    }
}
