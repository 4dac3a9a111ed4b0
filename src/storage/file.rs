//! File-backed storage
//!
//! All slots live in one JSON object on disk. The file is read once on open
//! and rewritten in full after every mutation.

use super::{KeyValueStorage, StorageError, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// File name used inside the storage directory
pub const STORAGE_FILE: &str = "local_storage.json";

/// Local storage persisted to `<dir>/local_storage.json`
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create) storage in `dir`
    pub fn open(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(STORAGE_FILE);
        let items = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            HashMap::new()
        };

        tracing::debug!(path = ?path, slots = items.len(), "Opened local storage");

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_file(path: &Path) -> StorageResult<HashMap<String, String>> {
        let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn persist(&self, items: &HashMap<String, String>) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(items)?;

        // Write next to the target, then rename over it
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStorage for FileStorage {
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
        // Only publish the change once it is on disk
        let mut updated = items.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *items = updated;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        if !items.contains_key(key) {
            return Ok(());
        }
        let mut updated = items.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *items = updated;
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
