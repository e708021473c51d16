//! JSON file-backed key-value store.
//!
//! All entries live in one JSON object on disk, loaded once when the store is
//! opened. Every `set`/`remove` rewrites the whole file through a temporary
//! file and a rename, so a crash never leaves a half-written store behind.

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed
    ///
    /// A missing file yields an empty store. A file that is not a JSON object of
    /// strings is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Storage file {} is unreadable, starting empty: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened storage {} with {} entries", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Put back the entry a failed write replaced, keeping memory in step with disk
    fn restore(&mut self, key: &str, previous: Option<String>) {
        warn!("Write to {} failed, keeping previous value of '{}'", self.path.display(), key);
        match previous {
            Some(value) => {
                self.entries.insert(key.to_string(), value);
            }
            None => {
                self.entries.remove(key);
            }
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            self.restore(key, previous);
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist() {
            self.restore(key, Some(previous));
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set("theme", "dark").unwrap();
            store.set("recent_searches", r#"["pasta"]"#).unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(store.get("recent_searches").as_deref(), Some(r#"["pasta"]"#));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_remove_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("draft_search", "lasagna").unwrap();
        store.remove("draft_search").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("draft_search").is_none());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        let path = nested.join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("theme", "light").unwrap();
        fs::remove_dir_all(&nested).unwrap();

        assert!(store.set("theme", "dark").is_err());
        assert_eq!(store.get("theme").as_deref(), Some("light"));
        assert!(store.set("draft_search", "tacos").is_err());
        assert!(store.get("draft_search").is_none());
        assert!(store.remove("theme").is_err());
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json at all").unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("theme").is_none());

        store.set("theme", "light").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }
}
