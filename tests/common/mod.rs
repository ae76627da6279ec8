#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use wiktfetch::client::{Entry, FetchClient};
use wiktfetch::error::{FetchError, StorageError};
use wiktfetch::observer::ProgressObserver;
use wiktfetch::store::{FileRecordStore, RecordStore};

pub fn entry_for(word: &str) -> Entry {
    Entry::new(vec![json!({
        "partOfSpeech": "Noun",
        "language": "Dutch",
        "definitions": [{ "definition": format!("meaning of {}", word) }]
    })])
}

/// Succeeds for every word and remembers the order of requests.
#[derive(Default)]
pub struct RecordingClient {
    pub requested: Mutex<Vec<String>>,
}

impl RecordingClient {
    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }
}

#[async_trait]
impl FetchClient for RecordingClient {
    async fn fetch(&self, word: &str, _language: &str) -> Result<Entry, FetchError> {
        self.requested.lock().unwrap().push(word.to_string());
        Ok(entry_for(word))
    }
}

/// Always throttled.
#[derive(Default)]
pub struct ThrottledClient {
    pub calls: AtomicUsize,
}

#[async_trait]
impl FetchClient for ThrottledClient {
    async fn fetch(&self, _word: &str, _language: &str) -> Result<Entry, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS))
    }
}

/// File store that refuses to save one particular word.
pub struct FailingStore {
    pub inner: FileRecordStore,
    pub broken_word: String,
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn prepare(&self) -> Result<(), StorageError> {
        self.inner.prepare().await
    }

    async fn exists(&self, word: &str) -> Result<bool, StorageError> {
        self.inner.exists(word).await
    }

    async fn save(&self, word: &str, entry: &Entry) -> Result<(), StorageError> {
        if word == self.broken_word {
            return Err(StorageError::Io {
                operation: "write",
                path: self.inner.root().join(format!("{}.json", word)),
                source: std::io::Error::other("disk full"),
            });
        }
        self.inner.save(word, entry).await
    }
}

/// Captures every status line in emission order.
#[derive(Default)]
pub struct MessageLog {
    pub lines: Mutex<Vec<String>>,
    pub incs: AtomicU64,
    pub finished: AtomicUsize,
}

impl MessageLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn position(&self, line: &str) -> Option<usize> {
        self.lines().iter().position(|l| l == line)
    }
}

impl ProgressObserver for MessageLog {
    fn message(&self, msg: String) {
        self.lines.lock().unwrap().push(msg);
    }

    fn inc(&self, delta: u64) {
        self.incs.fetch_add(delta, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn record_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}
