//! Per-place liked / pinned / checked-in marks kept on the device.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use shared_types::PlaceId;

use crate::error::ExplorerError;

pub const STORAGE_KEY: &str = "placeFlags";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceFlags {
    pub liked: bool,
    pub pinned: bool,
    pub checked_in: bool,
}

impl PlaceFlags {
    fn is_blank(&self) -> bool {
        !self.liked && !self.pinned && !self.checked_in
    }
}

/// Key-value store the flag book is persisted to.
pub trait FlagStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ExplorerError>;
    fn save(&self, key: &str, value: &str) -> Result<(), ExplorerError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl FlagStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ExplorerError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ExplorerError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ExplorerError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ExplorerError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagBook {
    flags: BTreeMap<PlaceId, PlaceFlags>,
}

impl FlagBook {
    pub fn from_json(raw: &str) -> Result<Self, ExplorerError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, ExplorerError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads the book from storage. A missing entry or a blob that no longer
    /// parses gives an empty book.
    pub fn load(storage: &impl FlagStorage) -> Self {
        match storage.load(STORAGE_KEY) {
            Ok(Some(raw)) => Self::from_json(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable place flags");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "place flags unavailable");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &impl FlagStorage) -> Result<(), ExplorerError> {
        storage.save(STORAGE_KEY, &self.to_json()?)
    }

    pub fn get(&self, place_id: PlaceId) -> PlaceFlags {
        self.flags.get(&place_id).copied().unwrap_or_default()
    }

    pub fn toggle_like(&mut self, place_id: PlaceId) -> PlaceFlags {
        self.update(place_id, |flags| flags.liked = !flags.liked)
    }

    pub fn toggle_pin(&mut self, place_id: PlaceId) -> PlaceFlags {
        self.update(place_id, |flags| flags.pinned = !flags.pinned)
    }

    pub fn check_in(&mut self, place_id: PlaceId) -> PlaceFlags {
        self.update(place_id, |flags| flags.checked_in = true)
    }

    fn update(&mut self, place_id: PlaceId, change: impl FnOnce(&mut PlaceFlags)) -> PlaceFlags {
        let mut flags = self.get(place_id);
        change(&mut flags);
        if flags.is_blank() {
            self.flags.remove(&place_id);
        } else {
            self.flags.insert(place_id, flags);
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_and_check_in_sticks() {
        let mut book = FlagBook::default();
        assert!(book.toggle_like(3).liked);
        assert!(!book.toggle_like(3).liked);
        assert!(book.check_in(3).checked_in);
        assert!(book.check_in(3).checked_in);
        assert_eq!(
            book.get(3),
            PlaceFlags {
                liked: false,
                pinned: false,
                checked_in: true
            }
        );
    }

    #[test]
    fn persists_through_storage() {
        let storage = MemoryStorage::default();
        let mut book = FlagBook::default();
        book.toggle_pin(9);
        book.toggle_like(12);
        book.save(&storage).unwrap();

        let restored = FlagBook::load(&storage);
        assert_eq!(restored, book);
        assert!(restored.get(9).pinned);
        assert_eq!(restored.get(1), PlaceFlags::default());
    }

    #[test]
    fn corrupt_blob_yields_empty_book() {
        let storage = MemoryStorage::default();
        storage.save(STORAGE_KEY, "{not json").unwrap();
        assert_eq!(FlagBook::load(&storage), FlagBook::default());
    }

    #[test]
    fn json_is_a_flat_object_keyed_by_place() {
        let mut book = FlagBook::default();
        book.toggle_like(5);
        assert_eq!(
            book.to_json().unwrap(),
            r#"{"5":{"liked":true,"pinned":false,"checked_in":false}}"#
        );
        let partial = FlagBook::from_json(r#"{"7":{"pinned":true}}"#).unwrap();
        assert!(partial.get(7).pinned);
    }
}
