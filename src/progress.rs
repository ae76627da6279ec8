//! Run-wide completion counter.
use crate::observer::ProgressObserver;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts processed words across all workers.
///
/// Each [`increment`](Self::increment) is a single atomic read-modify-write,
/// so the values it hands back are unique and strictly increasing with no
/// gaps, whatever the number of concurrent callers.
pub struct ProgressTracker {
    completed: AtomicUsize,
    total: usize,
    observer: Arc<dyn ProgressObserver>,
}

impl ProgressTracker {
    pub fn new(total: usize, observer: Arc<dyn ProgressObserver>) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            observer,
        }
    }

    /// Records one more processed word and returns `(completed, total)`.
    pub fn increment(&self) -> (usize, usize) {
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;

        self.observer.inc(1);
        self.observer
            .message(format!("Completed {}/{}", completed, self.total));

        (completed, self.total)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
