//! Key-value persistence for stats and settings
//!
//! Every store is string-keyed and holds string values. Integer reads parse the
//! stored string and fall back to the caller's default when the key is missing
//! or the value is unparsable.
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `JsonFileStore`: JSON object on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm)

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while opening or flushing a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque string-keyed settings store
pub trait KeyValueStore {
    /// Raw string value for `key`
    fn get_string(&self, key: &str) -> Option<String>;

    /// Write a raw string value
    fn set_string(&mut self, key: &str, value: &str);

    /// Integer value for `key`, or `default` if missing or invalid
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_string(key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(default)
    }

    /// Write an integer value
    fn set_int(&mut self, key: &str, value: i64) {
        self.set_string(key, &value.to_string());
    }
}

/// In-memory store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_int_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get_int("HighScore", 0), 0);
        assert_eq!(store.get_int("HighScore", 7), 7);
    }

    #[test]
    fn test_get_int_defaults_when_invalid() {
        let mut store = MemoryStore::new();
        store.set_string("HighScore", "twelve");
        assert_eq!(store.get_int("HighScore", 0), 0);
    }

    #[test]
    fn test_int_roundtrip() {
        let mut store = MemoryStore::new();
        store.set_int("TotalStars", 42);
        assert_eq!(store.get_int("TotalStars", 0), 42);
        assert_eq!(store.get_string("TotalStars").as_deref(), Some("42"));
        assert_eq!(store.len(), 1);
    }
}
