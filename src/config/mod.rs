//! Configuration Store
//!
//! The site's configuration is an open-ended JSON object fetched once at boot
//! and kept, serialized, in a single local-storage slot. Every read parses the
//! slot again, so the stored string is the single source of truth.
//!
//! # Keys
//!
//! Keys are looked up literally first and then as a dotted path, so
//! `path.resources` finds either `{"path.resources": …}` or
//! `{"path": {"resources": …}}`.
//!
//! # Writes
//!
//! [`ConfigStore::set`] writes a top-level key and re-serializes the whole
//! object as JSON, so `get` after `set` always round-trips.
//!
//! # Example
//!
//! ```rust
//! use folio::config::ConfigStore;
//! use folio::fetch::StaticFetcher;
//! use folio::storage::MemoryStorage;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = StaticFetcher::new()
//!     .with("config.json", r#"{"path": {"resources": "assets"}}"#);
//! let config = ConfigStore::new(Arc::new(fetcher), Arc::new(MemoryStorage::new()));
//!
//! config.load("config.json").await?;
//! assert_eq!(config.get_str("path.resources")?.as_deref(), Some("assets"));
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{ConfigError, ConfigResult};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::fetch::{Fetcher, FetchError};
use crate::storage::KeyValueStorage;

/// Local-storage slot holding the serialized configuration
pub const STORAGE_KEY: &str = "folio";

/// Configuration document path, relative to the site root
pub const CONFIG_PATH: &str = "config.json";

/// JSON configuration persisted in local storage
pub struct ConfigStore {
    fetcher: Arc<dyn Fetcher>,
    storage: Arc<dyn KeyValueStorage>,
    slot: String,
}

impl ConfigStore {
    /// Create a store using the default slot
    pub fn new(fetcher: Arc<dyn Fetcher>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_slot(fetcher, storage, STORAGE_KEY)
    }

    /// Create a store using a custom slot
    pub fn with_slot(
        fetcher: Arc<dyn Fetcher>,
        storage: Arc<dyn KeyValueStorage>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            storage,
            slot: slot.into(),
        }
    }

    /// Local-storage slot in use
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Fetch the document at `path` and store it
    ///
    /// Replaces whatever was stored before. Returns the parsed document.
    pub async fn load(&self, path: &str) -> ConfigResult<Value> {
        let text = self.fetcher.fetch_text(path).await?;

        let document: Value = serde_json::from_str(&text).map_err(|source| FetchError::Json {
            path: path.to_string(),
            source,
        })?;

        if !document.is_object() {
            return Err(ConfigError::NotAnObject {
                path: path.to_string(),
            });
        }

        let serialized =
            serde_json::to_string(&document).map_err(|e| ConfigError::Corrupt(e.to_string()))?;
        self.storage.set_item(&self.slot, &serialized)?;

        tracing::info!(
            path = %path,
            source = %self.fetcher.describe(),
            keys = document.as_object().map(|o| o.len()).unwrap_or(0),
            "Configuration loaded"
        );

        Ok(document)
    }

    /// Whether a configuration blob is stored
    pub fn is_loaded(&self) -> ConfigResult<bool> {
        Ok(self.storage.get_item(&self.slot)?.is_some())
    }

    /// The full stored configuration object
    pub fn snapshot(&self) -> ConfigResult<Map<String, Value>> {
        let raw = self
            .storage
            .get_item(&self.slot)?
            .ok_or(ConfigError::NotLoaded)?;

        match serde_json::from_str(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ConfigError::Corrupt(
                "stored configuration is not an object".to_string(),
            )),
            Err(e) => Err(ConfigError::Corrupt(e.to_string())),
        }
    }

    /// Value for `key`, or `None` if absent
    pub fn get(&self, key: &str) -> ConfigResult<Option<Value>> {
        let blob = self.snapshot()?;
        Ok(lookup(&blob, key).cloned())
    }

    /// String value for `key`
    ///
    /// Non-string values are reported as [`ConfigError::InvalidValue`].
    pub fn get_str(&self, key: &str) -> ConfigResult<Option<String>> {
        match self.get(key)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                error: format!("expected string, found {}", type_name(&other)),
            }),
        }
    }

    /// Value for `key` deserialized into `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.get(key)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    error: e.to_string(),
                }),
        }
    }

    /// Set a top-level key and persist the whole object
    ///
    /// Starts from an empty object when nothing has been loaded yet.
    pub fn set(&self, key: &str, value: Value) -> ConfigResult<()> {
        let mut blob = match self.snapshot() {
            Ok(blob) => blob,
            Err(ConfigError::NotLoaded) => Map::new(),
            Err(e) => return Err(e),
        };

        blob.insert(key.to_string(), value);

        let serialized = serde_json::to_string(&Value::Object(blob))
            .map_err(|e| ConfigError::Corrupt(e.to_string()))?;
        self.storage.set_item(&self.slot, &serialized)?;

        tracing::debug!(key = %key, "Configuration key updated");
        Ok(())
    }
}

/// Literal key first, then dotted path
fn lookup<'a>(blob: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = blob.get(key) {
        return Some(value);
    }

    let mut parts = key.split('.');
    let mut current = blob.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use std::collections::HashMap;

    const CONFIG: &str = r#"{
        "site": {"title": "Studio"},
        "path": {"resources": "assets"},
        "views": {"/": "about"},
        "flat.key": 7
    }"#;

    fn store_with(config: &str) -> (ConfigStore, Arc<MemoryStorage>) {
        let fetcher = StaticFetcher::new().with(CONFIG_PATH, config);
        let storage = Arc::new(MemoryStorage::new());
        let store = ConfigStore::new(Arc::new(fetcher), storage.clone());
        (store, storage)
    }

    #[tokio::test]
    async fn test_load_persists_json_blob() {
        let (store, storage) = store_with(CONFIG);
        assert!(!store.is_loaded().unwrap());

        let document = store.load(CONFIG_PATH).await.unwrap();
        assert_eq!(document["site"]["title"], "Studio");
        assert!(store.is_loaded().unwrap());

        let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
        let stored: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, document);
    }

    #[tokio::test]
    async fn test_get_literal_and_dotted() {
        let (store, _) = store_with(CONFIG);
        store.load(CONFIG_PATH).await.unwrap();

        assert_eq!(store.get_str("path.resources").unwrap().as_deref(), Some("assets"));
        assert_eq!(store.get("flat.key").unwrap(), Some(json!(7)));
        assert_eq!(store.get("views").unwrap(), Some(json!({"/": "about"})));
        assert_eq!(store.get("missing").unwrap(), None);
        assert_eq!(store.get("path.missing").unwrap(), None);
        assert_eq!(store.get("site.title.deeper").unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_as() {
        let (store, _) = store_with(CONFIG);
        store.load(CONFIG_PATH).await.unwrap();

        let views: HashMap<String, String> = store.get_as("views").unwrap().unwrap();
        assert_eq!(views.get("/").map(String::as_str), Some("about"));

        let err = store.get_as::<Vec<String>>("views").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = store.get_str("flat.key").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn test_set_roundtrips_through_json() {
        let (store, storage) = store_with(CONFIG);
        store.load(CONFIG_PATH).await.unwrap();

        store.set("theme", json!({"accent": "#c33"})).unwrap();
        assert_eq!(store.get("theme.accent").unwrap(), Some(json!("#c33")));

        // Stored slot is still plain JSON with the other keys intact
        let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
        let stored: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["site"]["title"], "Studio");
        assert_eq!(stored["theme"]["accent"], "#c33");
    }

    #[tokio::test]
    async fn test_get_before_load() {
        let (store, _) = store_with(CONFIG);
        assert!(matches!(store.get("views"), Err(ConfigError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_set_before_load_starts_empty() {
        let (store, _) = store_with(CONFIG);
        store.set("a", json!(1)).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(json!(1)));
        assert_eq!(store.snapshot().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_rejects_non_object() {
        let (store, _) = store_with("[1, 2]");
        let err = store.load(CONFIG_PATH).await.unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { .. }));
        assert!(!store.is_loaded().unwrap());
    }

    #[tokio::test]
    async fn test_load_malformed_json() {
        let (store, _) = store_with("{ nope");
        let err = store.load(CONFIG_PATH).await.unwrap_err();
        assert!(matches!(err, ConfigError::Fetch(FetchError::Json { .. })));
    }

    #[tokio::test]
    async fn test_missing_document() {
        let (store, _) = store_with(CONFIG);
        let err = store.load("other.json").await.unwrap_err();
        assert!(matches!(err, ConfigError::Fetch(FetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_corrupt_slot() {
        let (store, storage) = store_with(CONFIG);
        storage.set_item(STORAGE_KEY, "[object Object]").unwrap();
        assert!(matches!(store.get("views"), Err(ConfigError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_reload_replaces_blob() {
        let fetcher = Arc::new(StaticFetcher::new().with(CONFIG_PATH, r#"{"a": 1}"#));
        let store = ConfigStore::new(fetcher.clone(), Arc::new(MemoryStorage::new()));

        store.load(CONFIG_PATH).await.unwrap();
        fetcher.insert(CONFIG_PATH, r#"{"b": 2}"#).await;
        store.load(CONFIG_PATH).await.unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), Some(json!(2)));
    }
}
