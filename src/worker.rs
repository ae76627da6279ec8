use crate::error::{RetryAborted, WorkerError};
use crate::observer::ProgressObserver;
use crate::progress::ProgressTracker;
use crate::retry::RetryingFetcher;
use crate::state::{RunStats, WordRange};
use crate::store::RecordStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a worker shares with its siblings. All of it is either
/// read-only or internally synchronized.
#[derive(Clone)]
pub struct WorkerContext {
    pub words: Arc<[String]>,
    pub fetcher: Arc<RetryingFetcher>,
    pub store: Arc<dyn RecordStore>,
    pub progress: Arc<ProgressTracker>,
    pub stats: Arc<RunStats>,
    pub observer: Arc<dyn ProgressObserver>,
    pub cancel: CancellationToken,
}

/// What happened to a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOutcome {
    /// A record already existed; nothing was fetched.
    Skipped,
    /// Fetched and persisted after `attempts` calls to the client.
    Stored { attempts: u32 },
}

/// Drains one range, strictly in index order.
///
/// Skipped words still advance the progress counter, so a resumed run ends
/// at `total/total` like a fresh one. Any failure other than cancellation
/// cancels the whole run before it is returned.
pub async fn run_worker(range: WordRange, ctx: WorkerContext) -> Result<(), WorkerError> {
    let worker = range.index;
    ctx.observer.message(format!("worker {}: Started!", worker));

    for index in range.indices() {
        if ctx.cancel.is_cancelled() {
            return Err(WorkerError::Cancelled { worker, index });
        }

        match process_word(worker, index, &ctx).await {
            Ok(_) => {
                ctx.progress.increment();
            }
            Err(e @ WorkerError::Cancelled { .. }) => return Err(e),
            Err(e) => {
                tracing::error!(worker, index, range_start = range.start, range_end = range.end, error = %e, "aborting run");
                ctx.observer.message(format!("worker {}: {}", worker, e));
                ctx.cancel.cancel();
                return Err(e);
            }
        }
    }

    ctx.observer.message(format!("worker {}: Finished!", worker));
    Ok(())
}

/// Skip-if-exists, else fetch and store one word.
pub async fn process_word(
    worker: usize,
    index: usize,
    ctx: &WorkerContext,
) -> Result<WordOutcome, WorkerError> {
    let word = ctx.words[index].as_str();
    let storage_error = |source| WorkerError::Storage {
        worker,
        index,
        word: word.to_string(),
        source,
    };

    if ctx.store.exists(word).await.map_err(storage_error)? {
        tracing::debug!(worker, index, word, "record exists, skipping");
        ctx.stats.record_skipped();
        return Ok(WordOutcome::Skipped);
    }

    ctx.observer
        .message(format!("worker {}: Fetching \"{}\"...", worker, word));

    let fetched = ctx
        .fetcher
        .fetch(word, worker, ctx.observer.as_ref(), &ctx.cancel)
        .await
        .map_err(|source| match source {
            RetryAborted::Cancelled => WorkerError::Cancelled { worker, index },
            RetryAborted::Exhausted { .. } => WorkerError::Fetch {
                worker,
                index,
                word: word.to_string(),
                source,
            },
        })?;

    ctx.store
        .save(word, &fetched.entry)
        .await
        .map_err(storage_error)?;

    ctx.stats.record_fetched(fetched.retries());
    ctx.observer
        .message(format!("worker {}: Fetched \"{}\"!", worker, word));

    Ok(WordOutcome::Stored {
        attempts: fetched.attempts,
    })
}
