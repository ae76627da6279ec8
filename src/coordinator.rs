// src/coordinator.rs
use crate::client::FetchClient;
use crate::config::FetcherConfig;
use crate::error::{RunError, WorkerError};
use crate::observer::ProgressObserver;
use crate::progress::ProgressTracker;
use crate::retry::RetryingFetcher;
use crate::state::{RunStats, RunSummary};
use crate::store::{FileRecordStore, RecordStore};
use crate::utils;
use crate::worker::{WorkerContext, run_worker};
use futures_util::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a fixed pool of workers over a statically partitioned word list.
///
/// The flow for a run is:
/// 1. Make sure the record store is usable (before any worker starts).
/// 2. Split the list into one contiguous range per worker.
/// 3. Spawn every worker and wait for all of them.
/// 4. Report the first real failure, or a summary.
pub struct Coordinator {
    worker_count: usize,
    fetcher: Arc<RetryingFetcher>,
    store: Arc<dyn RecordStore>,
    observer: Arc<dyn ProgressObserver>,
    cancel: CancellationToken,
}

impl Coordinator {
    pub fn new(
        worker_count: usize,
        fetcher: RetryingFetcher,
        store: Arc<dyn RecordStore>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            worker_count: worker_count.max(1),
            fetcher: Arc::new(fetcher),
            store,
            observer,
            cancel: CancellationToken::new(),
        }
    }

    /// Wires the coordinator the way the binary runs it: JSON files under
    /// the configured output root, retry policy and language from `config`.
    pub fn from_config(
        config: &FetcherConfig,
        client: Arc<dyn FetchClient>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        let fetcher = RetryingFetcher::new(client, config.language.clone(), config.retry_policy());
        let store = Arc::new(FileRecordStore::new(&config.output_root));
        Self::new(config.worker_count, fetcher, store, observer)
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the current run, and every later one, at the next
    /// word or retry boundary.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub async fn run(&self, words: Vec<String>) -> Result<RunSummary, RunError> {
        self.store.prepare().await.map_err(RunError::Prepare)?;

        let words: Arc<[String]> = words.into();
        let total = words.len();
        let ranges = utils::calculate_ranges(total, self.worker_count);
        tracing::info!(total, workers = self.worker_count, "starting run");

        // A failing worker only cancels this run, so the coordinator stays usable.
        let ctx = WorkerContext {
            words,
            fetcher: self.fetcher.clone(),
            store: self.store.clone(),
            progress: Arc::new(ProgressTracker::new(total, self.observer.clone())),
            stats: Arc::new(RunStats::default()),
            observer: self.observer.clone(),
            cancel: self.cancel.child_token(),
        };

        let mut tasks = Vec::with_capacity(ranges.len());
        for range in ranges {
            tracing::debug!(worker = range.index, start = range.start, end = range.end, "assigning range");
            let ctx = ctx.clone();
            tasks.push(tokio::spawn(async move { run_worker(range, ctx).await }));
        }

        let results = join_all(tasks).await;

        let mut failure: Option<WorkerError> = None;
        let mut cancelled = false;
        for result in results {
            match result? {
                Ok(()) => {}
                Err(WorkerError::Cancelled { .. }) => cancelled = true,
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        let summary = ctx.stats.summary(total);
        if let Some(e) = failure {
            return Err(e.into());
        }
        if cancelled {
            return Err(RunError::Cancelled { summary });
        }

        self.observer.finish();
        tracing::info!(
            fetched = summary.fetched,
            skipped = summary.skipped,
            retries = summary.retries,
            "run complete"
        );
        Ok(summary)
    }
}
