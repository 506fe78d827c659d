//! Key-value persistence for the floor.
//!
//! Each persisted record (balance, stats, alias, settlement log) lives in its own slot
//! under a fixed key. Persistence is best-effort: a [`Slot`] that fails
//! once logs a single warning and falls back to memory-only for the rest
//! of the session.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const BANKROLL_KEY: &str = "arcade.bankroll";
pub const STATS_KEY: &str = "arcade.stats";
pub const ALIAS_KEY: &str = "arcade.alias";
pub const HISTORY_KEY: &str = "arcade.history";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Persistent storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Stored value under {key} is malformed: {reason}")]
    Malformed { key: String, reason: String },
    #[error("Store lock poisoned")]
    Poisoned,
}

pub trait KeyValueStore: Send + Sync + fmt::Debug {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process store. Clones share the same map, which lets tests stand in
/// for a second process writing to the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A single persisted record with degrade-on-failure semantics.
#[derive(Debug, Clone)]
pub struct Slot {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    enabled: Arc<AtomicBool>,
}

impl Slot {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Raw stored text, or `None` when absent or unreadable.
    pub fn load_raw(&self) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        match self.store.read(self.key) {
            Ok(v) => v,
            Err(err) => {
                self.degrade(&err);
                None
            }
        }
    }

    /// Parsed JSON record. Missing and malformed values both read as `None`;
    /// malformed ones are logged.
    pub fn load_json<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = self.load_raw()?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                let err = StoreError::Malformed {
                    key: self.key.to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!(key = self.key, error = %err, "ignoring malformed persisted state");
                None
            }
        }
    }

    pub fn save_raw(&self, value: &str) {
        if !self.is_enabled() {
            return;
        }
        match self.store.write(self.key, value) {
            Ok(()) => tracing::trace!(key = self.key, "persisted"),
            Err(err) => self.degrade(&err),
        }
    }

    pub fn save_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(s) => self.save_raw(&s),
            Err(e) => tracing::error!(key = self.key, error = %e, "failed to encode record"),
        }
    }

    pub fn clear(&self) {
        if !self.is_enabled() {
            return;
        }
        if let Err(err) = self.store.remove(self.key) {
            self.degrade(&err);
        }
    }

    fn degrade(&self, err: &StoreError) {
        if self.enabled.swap(false, Ordering::AcqRel) {
            tracing::warn!(
                key = self.key,
                error = %err,
                "persistence unavailable, continuing in memory only"
            );
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::BrokenStore;
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        n: u32,
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.write("k", "v").unwrap();
        assert_eq!(b.read("k").unwrap().as_deref(), Some("v"));
        b.remove("k").unwrap();
        assert_eq!(a.read("k").unwrap(), None);
    }

    #[test]
    fn file_store_round_trips_and_tolerates_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).unwrap();
        assert_eq!(store.read(BANKROLL_KEY).unwrap(), None);
        store.write(BANKROLL_KEY, "750").unwrap();
        assert_eq!(store.read(BANKROLL_KEY).unwrap().as_deref(), Some("750"));
        store.remove(BANKROLL_KEY).unwrap();
        store.remove(BANKROLL_KEY).unwrap();
        assert_eq!(store.read(BANKROLL_KEY).unwrap(), None);
    }

    #[test]
    fn malformed_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.write(STATS_KEY, "{not json").unwrap();
        let slot = Slot::new(Arc::new(store), STATS_KEY);
        assert_eq!(slot.load_json::<Sample>(), None);
        // a malformed value does not disable the slot
        assert!(slot.is_enabled());
        slot.save_json(&Sample { n: 3 });
        assert_eq!(slot.load_json::<Sample>(), Some(Sample { n: 3 }));
    }

    #[test]
    fn failing_store_disables_slot_once() {
        let slot = Slot::new(Arc::new(BrokenStore), BANKROLL_KEY);
        slot.save_raw("10");
        assert!(!slot.is_enabled());
        assert_eq!(slot.load_raw(), None);
        slot.save_raw("20");
    }
}
