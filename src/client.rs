//! Remote lexical source.
//!
//! [`FetchClient`] is the seam the pipeline fetches through. The production
//! implementation, [`WiktionaryClient`], talks to the Wiktionary REST
//! definition endpoint, which returns every language section of a page keyed
//! by language code:
//!
//! ```json
//! { "nl": [ { "partOfSpeech": "Noun", "language": "Dutch", "definitions": [] } ] }
//! ```
//!
//! Only the usages for the requested language are kept.
use crate::error::FetchError;
use crate::utils;
use async_trait::async_trait;
use governor::state::InMemoryState;
use governor::{RateLimiter, clock::DefaultClock, state::direct::NotKeyed};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub type ArcRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

pub const DEFAULT_BASE_URL: &str = "https://en.wiktionary.org/api/rest_v1/page/definition/";

/// Dictionary data for one word in one language.
///
/// The content is opaque to the pipeline: it is whatever usage objects the
/// source returned, persisted as-is. A usable entry is never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(Vec<Value>);

impl Entry {
    pub fn new(usages: Vec<Value>) -> Self {
        Entry(usages)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn usages(&self) -> &[Value] {
        &self.0
    }
}

#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Fetches the entry for `word` in `language`.
    ///
    /// An empty entry is a valid return value; deciding what it means is up
    /// to the caller.
    async fn fetch(&self, word: &str, language: &str) -> Result<Entry, FetchError>;
}

/// [`FetchClient`] backed by the Wiktionary REST API.
pub struct WiktionaryClient {
    http: reqwest::Client,
    base_url: Url,
    limiter: Option<ArcRateLimiter>,
}

impl WiktionaryClient {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            limiter: None,
        }
    }

    /// Throttles outgoing requests. The limiter is shared by every worker
    /// holding this client.
    pub fn with_rate_limiter(mut self, limiter: ArcRateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// HTTP client with the user agent and timeout used for all requests.
    pub fn http_client() -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(concat!("wiktfetch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
    }
}

#[async_trait]
impl FetchClient for WiktionaryClient {
    async fn fetch(&self, word: &str, language: &str) -> Result<Entry, FetchError> {
        if let Some(ref l) = self.limiter {
            l.until_ready().await;
        }

        let url = utils::definition_url(&self.base_url, word)?;
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let mut sections: HashMap<String, Vec<Value>> = serde_json::from_slice(&body)?;

        Ok(Entry::new(sections.remove(language).unwrap_or_default()))
    }
}
