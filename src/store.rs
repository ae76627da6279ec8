//! Persistent records, one per word.
//!
//! A record's existence is the only resume signal: there is no manifest or
//! checkpoint file. Records are written once and never touched again.
use crate::client::Entry;
use crate::error::StorageError;
use crate::utils;
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates the storage location if it is missing.
    async fn prepare(&self) -> Result<(), StorageError>;

    /// Whether a record for `word` has already been persisted.
    async fn exists(&self, word: &str) -> Result<bool, StorageError>;

    async fn save(&self, word: &str, entry: &Entry) -> Result<(), StorageError>;
}

/// Stores each record as `<root>/<word>.json`, escaping words that are not
/// safe file names (see [`utils::record_file_name`]).
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    root: PathBuf,
}

impl FileRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, word: &str) -> PathBuf {
        self.root.join(utils::record_file_name(word))
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn prepare(&self) -> Result<(), StorageError> {
        match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::RootNotDirectory(self.root.clone())),
            Err(e) if e.kind() == ErrorKind::NotFound => fs::create_dir_all(&self.root)
                .await
                .map_err(|e| StorageError::io("create", &self.root, e)),
            Err(e) => Err(StorageError::io("inspect", &self.root, e)),
        }
    }

    async fn exists(&self, word: &str) -> Result<bool, StorageError> {
        let path = self.record_path(word);
        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::io("check", &path, e))
    }

    async fn save(&self, word: &str, entry: &Entry) -> Result<(), StorageError> {
        let path = self.record_path(word);
        let json = serde_json::to_vec_pretty(entry).map_err(|source| StorageError::Serialize {
            word: word.to_string(),
            source,
        })?;

        // A record either exists complete or not at all. Each write has its
        // own temp file, so a word listed twice can be saved concurrently.
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || {
            let mut tmp = NamedTempFile::new_in(&root)
                .map_err(|e| StorageError::io("create temp file in", &root, e))?;
            tmp.write_all(&json)
                .map_err(|e| StorageError::io("write", tmp.path(), e))?;
            match tmp.persist(&path) {
                Ok(_) => Ok(()),
                // Another writer got there first with the same word.
                Err(_) if path.is_file() => Ok(()),
                Err(e) => Err(StorageError::io("persist", &path, e.error)),
            }
        })
        .await
        .map_err(|e| StorageError::io("write", &self.root, std::io::Error::other(e)))?
    }
}
