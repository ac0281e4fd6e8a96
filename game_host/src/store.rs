//! Durable key-value storage and the proxy the decision context reaches it through

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not a flat JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat key to string mapping. Keys and value schema belong to the caller.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Storage that lives as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON object on disk, read on every get and rewritten on every set
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// The file does not need to exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Simulation-side end of the storage relay
///
/// Every request goes straight through to the backing storage. Failures are
/// logged and never reach the decision context: a failed read looks like an
/// absent key, a failed write is dropped.
pub struct StoreProxy<S> {
    storage: S,
}

impl<S: Storage> StoreProxy<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => {
                debug!(key, found = value.is_some(), "storage get");
                value
            }
            Err(e) => {
                warn!(key, error = %e, "storage get failed");
                None
            }
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "storage set failed");
        } else {
            debug!(key, bytes = value.len(), "storage set");
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
