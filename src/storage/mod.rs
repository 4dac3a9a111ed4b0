//! Local Key-Value Storage
//!
//! String-valued slots addressed by key, the way a browser's local storage
//! works. Writes replace the previous value ("last write wins"); nothing is
//! versioned or migrated.
//!
//! - [`MemoryStorage`]: process-lifetime slots, used in tests and one-shot runs
//! - [`FileStorage`]: slots persisted to a single JSON file

mod error;
mod file;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;

use std::collections::HashMap;
use std::sync::RwLock;

/// Synchronous string key-value storage
pub trait KeyValueStorage: Send + Sync {
    /// Read a slot
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a slot, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a slot (no-op if absent)
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// All keys currently stored
    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let items = self
            .items
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        items.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let items = self
            .items
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(items.keys().cloned().collect())
    }
}
