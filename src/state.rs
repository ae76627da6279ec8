//! Shared run state.
//!
//! The ranges handed out to workers are fixed once the word list has been
//! partitioned. The counters in [`RunStats`] are the only values workers
//! mutate concurrently, and they are plain atomics.
use std::ops::Range;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// A contiguous slice of the word list owned by exactly one worker.
///
/// `start` is inclusive and `end` is exclusive, so an empty range has
/// `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordRange {
    /// Index of the worker this range belongs to.
    pub index: usize,
    /// First word index (inclusive).
    pub start: usize,
    /// One past the last word index.
    pub end: usize,
}

impl WordRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Word indices in processing order.
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Counters updated by workers while a run is in progress.
#[derive(Debug, Default)]
pub struct RunStats {
    fetched: AtomicUsize,
    skipped: AtomicUsize,
    retries: AtomicU64,
}

impl RunStats {
    pub fn record_fetched(&self, retries: u32) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
        self.retries.fetch_add(u64::from(retries), Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self, total: usize) -> RunSummary {
        RunSummary {
            total,
            fetched: self.fetched.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
        }
    }
}

/// Outcome of a run, reported once every worker has stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of words in the input list.
    pub total: usize,
    /// Words fetched and persisted during this run.
    pub fetched: usize,
    /// Words whose record already existed.
    pub skipped: usize,
    /// Failed or empty attempts that were retried.
    pub retries: u64,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.fetched + self.skipped
    }
}
