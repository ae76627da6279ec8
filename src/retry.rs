//! Retry loop around a [`FetchClient`].
//!
//! The remote source gives no reliable way to tell rate limiting apart from
//! any other failure, so every error and every empty result is handled the
//! same way: wait a fixed delay, then try again. In production the loop never
//! gives up; it only stops when the run is cancelled.
use crate::client::{Entry, FetchClient};
use crate::error::RetryAborted;
use crate::observer::ProgressObserver;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed wait before each retry.
    pub delay: Duration,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    pub fn forever(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    pub fn bounded(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: Some(max_attempts),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::forever(Self::DEFAULT_DELAY)
    }
}

/// A successfully fetched, non-empty entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub entry: Entry,
    /// Number of calls made to the client, including the successful one.
    pub attempts: u32,
}

impl Fetched {
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

pub struct RetryingFetcher {
    client: Arc<dyn FetchClient>,
    language: String,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new(client: Arc<dyn FetchClient>, language: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            client,
            language: language.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `word` until a non-empty entry comes back.
    ///
    /// `worker` only labels the pause diagnostics. The token is checked
    /// before every attempt and interrupts the backoff wait.
    pub async fn fetch(
        &self,
        word: &str,
        worker: usize,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
    ) -> Result<Fetched, RetryAborted> {
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(RetryAborted::Cancelled);
            }

            attempt += 1;

            match self.client.fetch(word, &self.language).await {
                Ok(entry) if !entry.is_empty() => {
                    return Ok(Fetched {
                        entry,
                        attempts: attempt,
                    });
                }
                Ok(_) => {
                    tracing::debug!(worker, word, attempt, "empty result");
                }
                Err(e) => {
                    tracing::debug!(worker, word, attempt, error = %e, "fetch failed");
                }
            }

            if let Some(max) = self.policy.max_attempts
                && attempt >= max
            {
                return Err(RetryAborted::Exhausted { attempts: attempt });
            }

            observer.message(format!("Rate limited, pausing worker {}...", worker));

            tokio::select! {
                _ = cancel.cancelled() => return Err(RetryAborted::Cancelled),
                _ = sleep(self.policy.delay) => {}
            }
        }
    }
}
