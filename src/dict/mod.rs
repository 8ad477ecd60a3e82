//! Dictionary cache store.
//!
//! Dictionaries are named sets of label/value option pairs used to populate
//! selectors (user status, role codes, ...). The backend serves them all in
//! one bulk call (`GET /api/v1/config/dict`); this store caches the result
//! process-wide and persists it as JSON under `~/.adminctl/dict-cache.json`
//! so later invocations start warm.
//!
//! There is no TTL and no eviction: entries live until the next
//! [`DictStore::load_dict_items`] overwrites them or
//! [`DictStore::clear_dict_cache`] wipes the cache.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Deserializer, Serialize};

use crate::http::{Client, Result};

/// File name of the persisted cache inside the app dot-directory.
const CACHE_FILE: &str = "dict-cache.json";

// ---------------------------------------------------------------------------
// Option pairs
// ---------------------------------------------------------------------------

/// One dictionary entry: a display label and its stored value.
///
/// The backend emits values as strings or numbers depending on the
/// dictionary; they are normalized to strings on deserialization so lookups
/// compare uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictOption {
    #[serde(default)]
    pub label: String,
    #[serde(deserialize_with = "value_as_string", default)]
    pub value: String,
}

/// Accept a JSON string, number, or bool and render it as a string.
fn value_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Process-wide dictionary cache: dict code → ordered option list.
///
/// Writes go through to the backing file when one is configured; reads are
/// served from memory only.
pub struct DictStore {
    cache: RwLock<HashMap<String, Vec<DictOption>>>,
    path: Option<PathBuf>,
}

impl DictStore {
    /// In-memory store with no persistence (tests, embedding).
    pub fn in_memory() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Store backed by the default cache file, warmed from disk when the
    /// file exists. A missing or unreadable file starts the cache empty.
    pub fn open() -> Self {
        match default_cache_path() {
            Some(path) => Self::open_at(path),
            None => Self::in_memory(),
        }
    }

    /// Store backed by an explicit cache file path.
    pub fn open_at(path: PathBuf) -> Self {
        let cache = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            cache: RwLock::new(cache),
            path: Some(path),
        }
    }

    /// Bulk-fetch all dictionaries and cache them, overwriting any prior
    /// value per code. A fetch failure propagates and leaves the cache
    /// untouched.
    pub fn load_dict_items(&self, client: &Client) -> Result<()> {
        let data = client.config().dict()?;
        {
            let mut cache = self.cache.write().unwrap();
            for (code, options) in data {
                cache.insert(code, options);
            }
        }
        self.persist();
        Ok(())
    }

    /// The cached option list for a dict code; empty for unknown codes.
    pub fn get_dict_items(&self, code: &str) -> Vec<DictOption> {
        self.cache
            .read()
            .unwrap()
            .get(code)
            .cloned()
            .unwrap_or_default()
    }

    /// Codes currently cached, sorted for stable display.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.cache.read().unwrap().keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Reset the cache to empty (and persist the empty map).
    pub fn clear_dict_cache(&self) {
        self.cache.write().unwrap().clear();
        self.persist();
    }

    /// Write the cache to its backing file, if any. Persistence failures are
    /// ignored: the in-memory cache stays authoritative for this process.
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let cache = self.cache.read().unwrap();
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(&*cache) {
            let _ = fs::write(path, json);
        }
    }
}

/// Default cache file path: `~/.adminctl/dict-cache.json`.
fn default_cache_path() -> Option<PathBuf> {
    crate::config::app_dir().map(|dir| dir.join(CACHE_FILE))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> Vec<DictOption> {
        pairs
            .iter()
            .map(|(label, value)| DictOption {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect()
    }

    #[test]
    fn unknown_code_returns_empty_list() {
        let store = DictStore::in_memory();
        assert!(store.get_dict_items("no_such_dict").is_empty());
    }

    #[test]
    fn clear_resets_to_empty() {
        let store = DictStore::in_memory();
        store
            .cache
            .write()
            .unwrap()
            .insert("status".to_string(), options(&[("Enabled", "1")]));
        assert_eq!(store.get_dict_items("status").len(), 1);

        store.clear_dict_cache();
        assert!(store.get_dict_items("status").is_empty());
        assert!(store.codes().is_empty());
    }

    #[test]
    fn numeric_option_values_normalize_to_strings() {
        let option: DictOption =
            serde_json::from_str(r#"{"label": "Enabled", "value": 1}"#).unwrap();
        assert_eq!(option.value, "1");

        let option: DictOption =
            serde_json::from_str(r#"{"label": "Admin", "value": "admin"}"#).unwrap();
        assert_eq!(option.value, "admin");
    }

    #[test]
    fn open_at_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("adminctl-dict-test-{}", std::process::id()));
        let path = dir.join(CACHE_FILE);
        let _ = fs::remove_file(&path);

        let store = DictStore::open_at(path.clone());
        store
            .cache
            .write()
            .unwrap()
            .insert("gender".to_string(), options(&[("Male", "1"), ("Female", "2")]));
        store.persist();

        let reopened = DictStore::open_at(path.clone());
        assert_eq!(
            reopened.get_dict_items("gender"),
            options(&[("Male", "1"), ("Female", "2")])
        );

        let _ = fs::remove_dir_all(&dir);
    }
}
