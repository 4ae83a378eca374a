use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use crate::{
    summary::model::DailySummary,
    utils::time::{daily_summary_name, focus_log_name, screenshot_prefix},
};

use super::entities::{ActivityRecord, parse_lines};

/// Interface over the day-keyed files in the data directory. The activity
/// log is the only thing the daemon writes continuously; summaries are a
/// cache, screenshots and OCR texts arrive from outside and are read-only.
pub trait FocusStorage {
    /// Appends one record to the day's activity log. Records are immutable
    /// once written; nothing ever rewrites an existing line.
    fn append_record(
        &self,
        date: NaiveDate,
        record: ActivityRecord,
    ) -> impl Future<Output = Result<()>>;

    /// Reads the whole activity log for a day, together with the number of
    /// lines that had to be dropped. A missing log reads as an empty day.
    fn read_day(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<(Vec<ActivityRecord>, usize)>> + Send;

    /// Reads the cached summary document if a valid one exists.
    fn read_summary(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<DailySummary>>> + Send;

    fn write_summary(
        &self,
        date: NaiveDate,
        summary: &DailySummary,
    ) -> impl Future<Output = Result<()>>;

    /// Names of the day's screenshot images, sorted.
    fn list_screenshots(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Contents of the day's OCR text files, in filename order. A file that
    /// can't be read loses only its own contribution.
    fn read_ocr_texts(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<String>>> + Send;
}

impl<T: Deref> FocusStorage for T
where
    T::Target: FocusStorage,
{
    fn append_record(
        &self,
        date: NaiveDate,
        record: ActivityRecord,
    ) -> impl Future<Output = Result<()>> {
        self.deref().append_record(date, record)
    }

    fn read_day(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<(Vec<ActivityRecord>, usize)>> + Send {
        self.deref().read_day(date)
    }

    fn read_summary(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<DailySummary>>> + Send {
        self.deref().read_summary(date)
    }

    fn write_summary(
        &self,
        date: NaiveDate,
        summary: &DailySummary,
    ) -> impl Future<Output = Result<()>> {
        self.deref().write_summary(date, summary)
    }

    fn list_screenshots(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<String>>> + Send {
        self.deref().list_screenshots(date)
    }

    fn read_ocr_texts(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<String>>> + Send {
        self.deref().read_ocr_texts(date)
    }
}

/// The main realization of [FocusStorage].
pub struct FocusStorageImpl {
    data_dir: PathBuf,
}

impl FocusStorageImpl {
    pub fn new(data_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&data_dir)?;

        Ok(Self { data_dir })
    }

    async fn read_log_inner(path: &Path) -> Result<(Vec<ActivityRecord>, usize)> {
        async fn extract(path: &Path) -> std::result::Result<String, std::io::Error> {
            debug!("Extracting {path:?}");
            let mut file = File::open(path).await?;
            file.lock_shared()?;
            let mut text = String::new();
            let read_result = file.read_to_string(&mut text).await;
            file.unlock_async().await?;
            read_result?;
            Ok(text)
        }

        match extract(path).await {
            Ok(text) => Ok(parse_lines(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok((vec![], 0)),
            Err(e) => Err(e)?,
        }
    }

    async fn append_with_file(file: &mut File, record: ActivityRecord) -> Result<()> {
        let mut buffer = serde_json::to_vec(&record)?;
        buffer.push(b'\n');
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }

    async fn matching_files(&self, prefix: &str, suffix: &str) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        let mut names = vec![];
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(prefix) && name.ends_with(suffix) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

impl FocusStorage for FocusStorageImpl {
    async fn append_record(&self, date: NaiveDate, record: ActivityRecord) -> Result<()> {
        let path = self.data_dir.join(focus_log_name(date));

        let mut file = File::options()
            .append(true)
            .create(true)
            .open(path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::append_with_file(&mut file, record).await;
        file.unlock_async().await?;
        result
    }

    async fn read_day(&self, date: NaiveDate) -> Result<(Vec<ActivityRecord>, usize)> {
        Self::read_log_inner(&self.data_dir.join(focus_log_name(date))).await
    }

    async fn read_summary(&self, date: NaiveDate) -> Result<Option<DailySummary>> {
        let path = self.data_dir.join(daily_summary_name(date));
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(summary) => Ok(Some(summary)),
                Err(e) => {
                    // A torn write from a previous shutdown. Recomputing is
                    // always possible, so the cache is simply ignored.
                    warn!("Cached summary {path:?} is corrupted: {e}");
                    Ok(None)
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)?,
        }
    }

    async fn write_summary(&self, date: NaiveDate, summary: &DailySummary) -> Result<()> {
        let mut buffer = serde_json::to_vec_pretty(summary)?;
        buffer.push(b'\n');
        tokio::fs::write(self.data_dir.join(daily_summary_name(date)), buffer).await?;
        Ok(())
    }

    async fn list_screenshots(&self, date: NaiveDate) -> Result<Vec<String>> {
        self.matching_files(&screenshot_prefix(date), ".png").await
    }

    async fn read_ocr_texts(&self, date: NaiveDate) -> Result<Vec<String>> {
        let names = self.matching_files(&screenshot_prefix(date), ".txt").await?;
        let mut texts = vec![];
        for name in names {
            match tokio::fs::read_to_string(self.data_dir.join(&name)).await {
                Ok(text) => texts.push(text),
                Err(e) => warn!("Could not read OCR file {name}: {e}"),
            }
        }
        Ok(texts)
    }
}
