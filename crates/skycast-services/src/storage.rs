//! Persistent key-value storage backends.
//!
//! String keys to string payloads with synchronous whole-value reads and
//! writes. `FileStorage` keeps one file per key under a base directory;
//! `MemoryStorage` backs tests. Within one turn of the host's event loop
//! nothing else can interleave, so a whole-value write is effectively
//! atomic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a stored payload failed.
    #[error("Storage read failed: {0}")]
    Read(String),

    /// Writing a payload failed.
    #[error("Storage write failed: {0}")]
    Write(String),
}

impl StorageError {
    /// Create a read error.
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read(message.into())
    }

    /// Create a write error.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write(message.into())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for persistent key-value storage.
pub trait StorageBackend: Send {
    /// Read the payload stored under `key`.
    ///
    /// Returns `None` if nothing was ever stored under the key.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the payload stored under `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// File-backed storage: one file per key under a base directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::write(e.to_string()))?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::read(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        std::fs::write(self.key_path(key), value)
            .map_err(|e| StorageError::write(e.to_string()))
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
