//! Device-local key-value persistence.
//!
//! The archive is one JSON document stored under a fixed key. [`KvStore`]
//! keeps the backend swappable; [`FileStore`] is the durable on-disk
//! backend, [`MemoryStore`] an ephemeral in-memory one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::ArchiveError;

/// A string-keyed store of string documents.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the document under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, ArchiveError>;

    /// Overwrite the document under `key` in full.
    async fn put(&self, key: &str, value: &str) -> Result<(), ArchiveError>;
}

/// File-backed store: one `<key>.json` file per key inside a data directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }

    /// Ensure the data directory exists.
    pub async fn ensure_dirs(&self) -> Result<(), ArchiveError> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ArchiveError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path).await?))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), ArchiveError> {
        if let Some(parent) = self.path_for(key).parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}

/// In-memory store with no durability.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ArchiveError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), ArchiveError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
