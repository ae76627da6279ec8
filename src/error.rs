//! Error types shared by the fetch pipeline.
//!
//! Fetch failures are transient and never leave the retry loop. Storage
//! failures are fatal for the run and carry enough context (worker, word,
//! position) to be reported to the operator.
use crate::state::RunSummary;
use std::path::PathBuf;
use thiserror::Error;

/// A single failed attempt to fetch a word from the remote source.
///
/// The retry loop treats every variant the same way: wait, then try again.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed. Status Code: {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures of the record store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("output location {} exists and is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("failed to {operation} {}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record for {word:?}")]
    Serialize {
        word: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Why the retry loop stopped without producing an entry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RetryAborted {
    #[error("retry loop cancelled")]
    Cancelled,

    /// Only reachable with a bounded [`RetryPolicy`](crate::retry::RetryPolicy).
    #[error("gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Terminal failure of one worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker {worker} failed to store {word:?} (index {index})")]
    Storage {
        worker: usize,
        index: usize,
        word: String,
        #[source]
        source: StorageError,
    },

    #[error("worker {worker} gave up fetching {word:?} (index {index})")]
    Fetch {
        worker: usize,
        index: usize,
        word: String,
        #[source]
        source: RetryAborted,
    },

    #[error("worker {worker} cancelled before index {index}")]
    Cancelled { worker: usize, index: usize },
}

/// Failure of a whole coordinator run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to prepare the output location")]
    Prepare(#[source] StorageError),

    #[error(transparent)]
    Worker(#[from] WorkerError),

    #[error("run cancelled after {} of {} words", .summary.completed(), .summary.total)]
    Cancelled { summary: RunSummary },

    #[error("worker task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}
