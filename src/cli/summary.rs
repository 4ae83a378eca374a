use std::fmt::Display;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use futures::{StreamExt, stream};
use now::DateTimeNow;

use crate::{
    daemon::{FOCUS_LOGS_DIR, storage::log_store::FocusStorageImpl},
    summary::{model::DailySummary, service::SummaryService},
    utils::{dir::create_application_default_path, percentage::Percentage},
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct SummaryCommand {
    #[arg(
        long,
        short,
        help = "Date of the summary. Examples are \"2025-04-22\", \"yesterday\", \"3 days ago\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, help = "Print the raw summary document as json")]
    json: bool,
    #[arg(
        long,
        help = "Recompute from the activity log even if a cached summary exists"
    )]
    rebuild: bool,
    #[arg(short = 'p', long = "percentage", help = "Only show apps with at least the specified share of the day", default_value_t = Percentage::new_opt(1.).unwrap())]
    min_percentage: Percentage,
}

/// Command to process `summary`. Prints the derived document for one day,
/// preferring the cache the daemon wrote unless asked to rebuild.
pub async fn process_summary_command(
    SummaryCommand {
        date,
        date_style,
        json,
        rebuild,
        min_percentage,
    }: SummaryCommand,
) -> Result<()> {
    let date = parse_date_arg(date.as_deref(), date_style)?;
    let service = open_service()?;

    let summary = if rebuild {
        service.rebuild(date).await
    } else {
        service.summarize(date).await
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, min_percentage);
    }
    Ok(())
}

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(
        long = "start",
        short,
        help = "First day of the report. Examples are \"2025-04-14\", \"monday\", \"2 weeks ago\". Defaults to the start of the current week"
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "Last day of the report. Defaults to today"
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `report`. One line per day, oldest first.
pub async fn process_report_command(
    ReportCommand {
        start_date,
        end_date,
        date_style,
    }: ReportCommand,
) -> Result<()> {
    let start = match start_date {
        Some(v) => parse_date_arg(Some(&v), date_style)?,
        None => Local::now().beginning_of_week().date_naive(),
    };
    let end = parse_date_arg(end_date.as_deref(), date_style)?;
    if end < start {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Report range ends ({end}) before it starts ({start})"),
            )
            .into());
    }

    let service = open_service()?;
    let service = &service;

    // Summaries for different days touch different files, reading a few
    // concurrently is safe.
    let mut summaries = stream::iter(date_range(start, end))
        .map(|date| async move { service.summarize(date).await })
        .buffered(4);

    println!("date\t\tscore\tactive\t\tmeetings");
    while let Some(summary) = summaries.next().await {
        println!(
            "{}\t{}\t{}\t\t{}",
            summary.date,
            summary.focus_score,
            format_duration(Duration::seconds(summary.total_time)),
            format_duration(Duration::seconds(summary.meeting_time)),
        );
    }
    Ok(())
}

fn open_service() -> Result<SummaryService<FocusStorageImpl>> {
    let storage = FocusStorageImpl::new(create_application_default_path()?.join(FOCUS_LOGS_DIR))?;
    Ok(SummaryService::new(storage))
}

/// `2025-04-22` style dates parse directly; anything else goes through
/// chrono-english so "yesterday" works. No date means today.
fn parse_date_arg(value: Option<&str>, date_style: DateStyle) -> Result<NaiveDate> {
    let Some(value) = value else {
        return Ok(Local::now().date_naive());
    };
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    match parse_date_string(value, Local::now(), date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to parse date {value}: {e}"),
            )
            .into()),
    }
}

/// All days from start to end, both inclusive.
fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), move |current| {
        let next = current.succ_opt().expect("End of time should never happen");
        (next <= end).then_some(next)
    })
}

fn print_summary(summary: &DailySummary, min_percentage: Percentage) {
    println!("Summary for {}", summary.date);
    if let Some(error) = &summary.error {
        println!("  (incomplete: {error})");
    }
    println!("  focus score   {}/100", summary.focus_score);
    println!(
        "  active time   {}",
        format_duration(Duration::seconds(summary.total_time))
    );
    println!(
        "  meeting time  {}",
        format_duration(Duration::seconds(summary.meeting_time))
    );
    println!("  events        {}", summary.distraction_events);
    if !summary.keywords.is_empty() {
        println!("  keywords      {}", summary.keywords.join(", "));
    }
    if !summary.screenshots.is_empty() {
        println!("  screenshots   {}", summary.screenshots.len());
    }

    println!();
    for entry in &summary.app_breakdown {
        if entry.percentage < *min_percentage {
            continue;
        }
        println!(
            "{}%\t{}\t{}\t{}",
            entry.percentage as i32,
            format_duration(Duration::seconds(entry.time_spent)),
            entry.app_name,
            entry.exe_path
        );
    }

    if !summary.productive_apps.is_empty() {
        println!();
        println!("productive: {}", summary.productive_apps.join(", "));
    }
    if !summary.distraction_apps.is_empty() {
        println!("distraction: {}", summary.distraction_apps.join(", "));
    }
}

fn format_duration(v: Duration) -> String {
    if v.num_hours() > 0 {
        format!(
            "{}h{}m{}s",
            v.num_hours(),
            v.num_minutes() % 60,
            v.num_seconds() % 60
        )
    } else if v.num_minutes() > 0 {
        format!("{}m{}s", v.num_minutes() % 60, v.num_seconds() % 60)
    } else {
        format!("{}s", v.num_seconds() % 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn iso_dates_parse_without_the_english_parser() {
        let date = parse_date_arg(Some("2025-04-22"), DateStyle::Uk).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 4, 22).unwrap());
    }

    #[test]
    fn nonsense_dates_fail_validation() {
        assert!(parse_date_arg(Some("the day after never"), DateStyle::Uk).is_err());
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 22).unwrap();
        let days: Vec<_> = date_range(start, end).collect();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], start);
        assert_eq!(days[2], end);
    }

    #[tokio::test]
    async fn buffered_report_days_stay_in_order() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 24).unwrap();
        // Later days finish first; buffering must not reorder the output.
        let days: Vec<_> = tokio_stream::iter(date_range(start, end))
            .map(|date| async move {
                let delay = (25 - date.day()) as u64;
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                date
            })
            .buffered(4)
            .collect()
            .await;
        assert_eq!(days, date_range(start, end).collect::<Vec<_>>());
    }

    #[test]
    fn durations_format_compactly() {
        assert_eq!(format_duration(Duration::seconds(59)), "59s");
        assert_eq!(format_duration(Duration::seconds(61)), "1m1s");
        assert_eq!(format_duration(Duration::seconds(3601)), "1h0m1s");
    }
}
