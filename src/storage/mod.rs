//! Persisted key-value storage.
//!
//! The session only ever talks to the [`KeyValueStore`] port: whole string values
//! are read once at startup and overwritten in full after every mutation.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key of the persisted favorites list (JSON list of recipe snapshots)
pub const FAVORITES_KEY: &str = "recipe_favorites";
/// Key of the persisted recent searches (JSON list of strings)
pub const RECENT_SEARCHES_KEY: &str = "recent_searches";
/// Key of the theme preference (plain enum string)
pub const THEME_KEY: &str = "theme";
/// Key of the autosaved draft search text
pub const DRAFT_SEARCH_KEY: &str = "draft_search";

/// String-keyed store of string values
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite the full value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read a JSON value, treating a missing or corrupt entry as absent
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring corrupt stored value for '{}': {}", key, e);
            None
        }
    }
}

/// Serialize `value` and overwrite `key` with it
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
