use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use collection::collector::DataCollectionModule;
use processing::{ProcessingModule, focus_tracker::FocusTracker};
use storage::{log_store::FocusStorageImpl, record_event::WindowEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    summary::service::SummaryService,
    utils::clock::{Clock, DefaultClock},
    window_api::{GenericWindowManager, WindowManager},
};

pub mod args;
pub mod collection;
pub mod processing;
pub mod shutdown;
pub mod storage;

const DEFAULT_COLLECTION_INTERVAL: Duration = Duration::from_secs(1);

/// Name of the directory holding logs, summaries and screenshot artifacts
/// inside the application directory.
pub const FOCUS_LOGS_DIR: &str = "focus_logs";

/// Represents the starting point for the daemon
pub async fn start_daemon(dir: PathBuf) -> Result<()> {
    std::env::set_current_dir("/")?;

    let (sender, receiver) = mpsc::channel::<WindowEvent>(10);
    let manager = GenericWindowManager::new()?;

    let shutdown_token = CancellationToken::new();

    let collector = create_collector(sender, manager, &shutdown_token, DefaultClock);

    let processor = create_processor(dir.join(FOCUS_LOGS_DIR), receiver, DefaultClock)?;

    let (_, collection_result, processing_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        collector.run(),
        processor.run(),
    );

    if let Err(collection_result) = collection_result {
        error!("Collection module got an error {:?}", collection_result);
    }

    if let Err(processing_result) = processing_result {
        error!("Processing module got an error {:?}", processing_result);
    }

    Ok(())
}

fn create_collector(
    sender: mpsc::Sender<WindowEvent>,
    manager: impl WindowManager + 'static,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> DataCollectionModule {
    DataCollectionModule::new(
        sender,
        Box::new(manager),
        shutdown_token.clone(),
        DEFAULT_COLLECTION_INTERVAL,
        Box::new(clock),
    )
}

fn create_processor(
    data_dir: PathBuf,
    receiver: mpsc::Receiver<WindowEvent>,
    clock: impl Clock,
) -> Result<ProcessingModule<FocusTracker<Arc<FocusStorageImpl>>>, anyhow::Error> {
    let storage = Arc::new(FocusStorageImpl::new(data_dir)?);
    let tracker = FocusTracker::new(
        storage.clone(),
        SummaryService::new(storage),
        Box::new(clock),
    );
    Ok(ProcessingModule::new(receiver, tracker))
}

#[cfg(test)]
mod daemon_tests {
    use std::{fs, time::Duration};

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;
    use tokio::{sync::mpsc, time::Instant};
    use tokio_util::sync::CancellationToken;

    use crate::{
        daemon::{
            create_collector, create_processor,
            storage::{
                log_store::{FocusStorage, FocusStorageImpl},
                record_event::WindowEvent,
            },
        },
        utils::{clock::Clock, logging::TEST_LOGGING},
        window_api::{ActiveWindowData, MockWindowManager},
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn test_items() -> Vec<ActiveWindowData> {
        vec![
            ActiveWindowData {
                window_title: "main.py - editor".into(),
                exe_path: "/usr/bin/editor".into(),
            },
            ActiveWindowData {
                window_title: "main.py - editor".into(),
                exe_path: "/usr/bin/editor".into(),
            },
            ActiveWindowData {
                window_title: "inbox".into(),
                exe_path: "/usr/bin/mail".into(),
            },
        ]
    }

    #[derive(Clone)]
    struct TestClock {
        start_time: DateTime<Utc>,
        reference: Instant,
    }

    #[async_trait]
    impl Clock for TestClock {
        fn time(&self) -> DateTime<Utc> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep_until(&self, instant: tokio::time::Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    /// Very simple smoke test to check if the application is working properly. It can be improved
    /// by warping time so that it takes 10 times less time, but for now we have what we have.
    #[tokio::test]
    async fn smoke_test_daemon() -> Result<()> {
        *TEST_LOGGING;
        let mut mock_window_manager = MockWindowManager::new();
        let mut items = test_items().into_iter().cycle();
        mock_window_manager
            .expect_get_active_window_data()
            .returning(move || Ok(items.next().unwrap()))
            .times(..7);

        let shutdown_token = CancellationToken::new();

        let (sender, receiver) = mpsc::channel::<WindowEvent>(10);
        let test_clock = TestClock {
            start_time: Utc.from_utc_datetime(&TEST_START_DATE),
            reference: Instant::now(),
        };
        let collector = create_collector(
            sender,
            mock_window_manager,
            &shutdown_token,
            test_clock.clone(),
        );

        let dir = tempdir()?;

        let processor = create_processor(dir.path().to_path_buf(), receiver, test_clock.clone())?;

        let (_, collection_result, processing_result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(5500)).await;
                shutdown_token.cancel()
            },
            collector.run(),
            processor.run(),
        );

        collection_result?;
        processing_result?;

        let files = fs::read_dir(dir.path())?.collect::<Vec<_>>();
        assert!(!files.is_empty());

        let storage = FocusStorageImpl::new(dir.path().to_path_buf())?;

        let (records, skipped) = storage.read_day(TEST_START_DATE.date()).await?;

        assert_eq!(skipped, 0);
        // The samples cycle editor, editor, mail: a window change lands on
        // every third tick, plus whatever finalize closes at shutdown.
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.duration > 0.));

        // Shutdown finalizes the day, so the summary cache exists too.
        let summary = storage.read_summary(TEST_START_DATE.date()).await?;
        assert!(summary.is_some());

        Ok(())
    }
}
