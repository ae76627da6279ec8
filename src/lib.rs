//! # wiktfetch
//!
//! `wiktfetch` bulk-fetches dictionary entries from Wiktionary and stores
//! each one as its own JSON record. It is built for long offline runs against
//! a rate-limited server:
//! - A fixed pool of workers, each owning a contiguous slice of the word list
//! - Resuming for free: words that already have a record are skipped
//! - Unbounded fixed-delay retries on errors and empty (throttled) responses
//! - Optional client-side request throttling
//! - Cooperative cancellation between words and retries
//!
//! The binary wires [`WiktionaryClient`] and [`FileRecordStore`] into a
//! [`Coordinator`]; both sit behind traits so other sources and stores can be
//! plugged in.

pub mod args;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod observer;
pub mod progress;
pub mod retry;
pub mod state;
pub mod store;
pub mod utils;
pub mod worker;

pub use args::Args;
pub use client::{ArcRateLimiter, Entry, FetchClient, WiktionaryClient};
pub use crate::config::{FetcherConfig, Settings};
pub use coordinator::Coordinator;
pub use error::{FetchError, RetryAborted, RunError, StorageError, WorkerError};
pub use retry::{RetryPolicy, RetryingFetcher};
pub use state::{RunSummary, WordRange};
pub use store::{FileRecordStore, RecordStore};
