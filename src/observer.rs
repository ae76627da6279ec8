//! Progress reporting sinks.
//!
//! Workers never print directly. Every operator-facing line (worker
//! start/finish, fetch start/done, rate-limit pauses, completion counts)
//! goes through a [`ProgressObserver`], so the same pipeline can drive an
//! interactive progress bar, plain log output, or a test recorder.
use indicatif::ProgressBar;

pub trait ProgressObserver: Send + Sync {
    /// Emit one human-readable status line.
    fn message(&self, msg: String);
    /// Advance the overall progress by `delta` words.
    fn inc(&self, delta: u64);
    /// Called once when the run completes.
    fn finish(&self);
}

/// Renders progress as an `indicatif` bar and prints status lines above it.
pub struct ConsoleObserver {
    pub pb: ProgressBar,
}

impl ProgressObserver for ConsoleObserver {
    fn message(&self, msg: String) {
        self.pb.println(msg);
    }

    fn inc(&self, delta: u64) {
        self.pb.inc(delta);
    }

    fn finish(&self) {
        self.pb.finish_with_message("Done!");
    }
}

/// Forwards status lines to `tracing` at info level.
///
/// Used for non-interactive runs where a redrawn progress bar would only
/// clutter the log.
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn message(&self, msg: String) {
        tracing::info!("{}", msg);
    }

    fn inc(&self, _delta: u64) {}

    fn finish(&self) {
        tracing::info!("All workers finished");
    }
}

/// Discards everything.
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn message(&self, _msg: String) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_observer_tracks_position() {
        let observer = ConsoleObserver {
            pb: ProgressBar::hidden(),
        };
        observer.pb.set_length(3);

        observer.inc(1);
        observer.inc(2);
        observer.message("Completed 3/3".into());
        assert_eq!(observer.pb.position(), 3);

        observer.finish();
        assert!(observer.pb.is_finished());
    }
}
