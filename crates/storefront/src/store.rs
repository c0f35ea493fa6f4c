//! Shopper-local persistence for the packaging choice.
//!
//! The platform equivalent is browser local storage: a key-value text store
//! holding the last choice under [`ECO_PACKAGING_STORAGE_KEY`]. Here the
//! store is an adapter trait with two backends: in-memory for ordinary web
//! sessions (the choice lives as long as the session entry) and a JSON file
//! for deployments where choices should outlive the process.
//!
//! Store failures are never fatal to the synchronizer; callers log and
//! continue with the remote cart as the fallback source.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Mutex, RwLock};

use thiserror::Error;

use eco_packaging_core::{ECO_PACKAGING_STORAGE_KEY, PackagingChoice};

/// Errors from the local choice store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Local persistence adapter for the shopper's last packaging choice.
pub trait ChoiceStore: Send + Sync {
    /// Read the saved choice, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing store cannot be read.
    fn get(&self) -> Result<Option<PackagingChoice>, StoreError>;

    /// Save the choice.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing store cannot be written.
    fn set(&self, choice: PackagingChoice) -> Result<(), StoreError>;

    /// Remove the saved choice.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing store cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store; the choice lives as long as the owning session.
#[derive(Debug, Default)]
pub struct MemoryChoiceStore {
    slot: RwLock<Option<PackagingChoice>>,
}

impl MemoryChoiceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChoiceStore for MemoryChoiceStore {
    fn get(&self) -> Result<Option<PackagingChoice>, StoreError> {
        self.slot
            .read()
            .map(|guard| *guard)
            .map_err(|_| StoreError::Poisoned)
    }

    fn set(&self, choice: PackagingChoice) -> Result<(), StoreError> {
        *self.slot.write().map_err(|_| StoreError::Poisoned)? = Some(choice);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write().map_err(|_| StoreError::Poisoned)? = None;
        Ok(())
    }
}

/// File-backed store: one JSON object of string keys per shopper.
///
/// The file mirrors the local-storage shape, so other keys in it are
/// preserved across read-modify-write cycles.
#[derive(Debug)]
pub struct FileChoiceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileChoiceStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(map)?)?;
        Ok(())
    }
}

impl ChoiceStore for FileChoiceStore {
    fn get(&self) -> Result<Option<PackagingChoice>, StoreError> {
        let map = self.read_map()?;
        Ok(map
            .get(ECO_PACKAGING_STORAGE_KEY)
            .and_then(|value| PackagingChoice::from_str(value).ok()))
    }

    fn set(&self, choice: PackagingChoice) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut map = self.read_map()?;
        map.insert(
            ECO_PACKAGING_STORAGE_KEY.to_string(),
            choice.as_str().to_string(),
        );
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut map = self.read_map()?;
        map.remove(ECO_PACKAGING_STORAGE_KEY);
        self.write_map(&map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> (FileChoiceStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("eco-store-{}", uuid::Uuid::new_v4()));
        let path = dir.join("choices.json");
        (FileChoiceStore::new(path), dir)
    }

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryChoiceStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set(PackagingChoice::Minimal).unwrap();
        assert_eq!(store.get().unwrap(), Some(PackagingChoice::Minimal));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_round_trip() {
        let (store, dir) = temp_store();
        assert_eq!(store.get().unwrap(), None);

        store.set(PackagingChoice::Minimal).unwrap();
        assert_eq!(store.get().unwrap(), Some(PackagingChoice::Minimal));

        store.set(PackagingChoice::Standard).unwrap();
        assert_eq!(store.get().unwrap(), Some(PackagingChoice::Standard));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_preserves_other_keys() {
        let (store, dir) = temp_store();
        store.set(PackagingChoice::Minimal).unwrap();

        // Another component's key in the same file must survive our writes.
        let mut map = store.read_map().unwrap();
        map.insert("other_key".to_string(), "kept".to_string());
        store.write_map(&map).unwrap();

        store.set(PackagingChoice::Standard).unwrap();
        let map = store.read_map().unwrap();
        assert_eq!(map.get("other_key").unwrap(), "kept");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_corrupted_json_is_an_error() {
        let (store, dir) = temp_store();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&store.path, b"not json").unwrap();

        assert!(matches!(store.get(), Err(StoreError::Parse(_))));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_unknown_stored_value_reads_as_unset() {
        let (store, dir) = temp_store();
        let mut map = BTreeMap::new();
        map.insert(ECO_PACKAGING_STORAGE_KEY.to_string(), "recycled".to_string());
        store.write_map(&map).unwrap();

        assert_eq!(store.get().unwrap(), None);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
