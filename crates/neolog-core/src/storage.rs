//! Persisted settings
//!
//! The platform offers a flat key-value store of integers and booleans. The
//! watchface only needs three slots; their keys match the keys of the phone's
//! configuration message.
//!
//! [`MemoryStore`] is the in-RAM implementation used by hosts without their
//! own store. It can be snapshotted to bytes with `postcard`.

extern crate alloc;

use alloc::vec::Vec;
use heapless::LinearMap;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Maximum number of entries a [`MemoryStore`] keeps
pub const STORE_CAPACITY: usize = 8;

/// Slots used by the watchface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum SettingKey {
    BackgroundColor = 0,
    ForegroundColor = 1,
    StatusBar = 2,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::BackgroundColor,
        SettingKey::ForegroundColor,
        SettingKey::StatusBar,
    ];

    /// Numeric key shared by the store and the phone message
    pub const fn id(self) -> u32 {
        self as u32
    }

    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::BackgroundColor),
            1 => Some(Self::ForegroundColor),
            2 => Some(Self::StatusBar),
            _ => None,
        }
    }
}

/// A stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredValue {
    Int(i32),
    Bool(bool),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("settings store is full")]
    Full,
    #[error("failed to encode settings snapshot: {0}")]
    Encode(postcard::Error),
    #[error("failed to decode settings snapshot: {0}")]
    Decode(postcard::Error),
}

/// Key-value persistence provided by the host.
///
/// Missing keys read as `None`. Integers and booleans convert into each other
/// the way the platform does: a boolean written as an integer reads back as
/// `value != 0`.
pub trait SettingsStore {
    fn read(&self, key: SettingKey) -> Option<StoredValue>;

    fn write(&mut self, key: SettingKey, value: StoredValue) -> Result<(), StoreError>;

    fn read_int(&self, key: SettingKey) -> Option<i32> {
        match self.read(key)? {
            StoredValue::Int(value) => Some(value),
            StoredValue::Bool(value) => Some(value as i32),
        }
    }

    fn read_bool(&self, key: SettingKey) -> Option<bool> {
        match self.read(key)? {
            StoredValue::Int(value) => Some(value != 0),
            StoredValue::Bool(value) => Some(value),
        }
    }

    fn write_int(&mut self, key: SettingKey, value: i32) -> Result<(), StoreError> {
        self.write(key, StoredValue::Int(value))
    }

    fn write_bool(&mut self, key: SettingKey, value: bool) -> Result<(), StoreError> {
        self.write(key, StoredValue::Bool(value))
    }
}

impl<T: SettingsStore> SettingsStore for &mut T {
    fn read(&self, key: SettingKey) -> Option<StoredValue> {
        (**self).read(key)
    }

    fn write(&mut self, key: SettingKey, value: StoredValue) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// Flat in-memory store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: LinearMap<u32, StoredValue, STORE_CAPACITY>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: LinearMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode every entry with postcard.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let entries: Vec<(u32, StoredValue)> =
            self.entries.iter().map(|(k, v)| (*k, *v)).collect();
        postcard::to_allocvec(&entries).map_err(StoreError::Encode)
    }

    /// Rebuild a store from [`MemoryStore::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let entries: Vec<(u32, StoredValue)> =
            postcard::from_bytes(bytes).map_err(StoreError::Decode)?;

        let mut store = Self::new();
        for (key, value) in entries {
            store
                .entries
                .insert(key, value)
                .map_err(|_| StoreError::Full)?;
        }
        debug!("Loaded {} settings from snapshot", store.len());
        Ok(store)
    }
}

impl SettingsStore for MemoryStore {
    fn read(&self, key: SettingKey) -> Option<StoredValue> {
        self.entries.get(&key.id()).copied()
    }

    fn write(&mut self, key: SettingKey, value: StoredValue) -> Result<(), StoreError> {
        debug!("Persisting {:?} = {:?}", key, value);
        self.entries
            .insert(key.id(), value)
            .map(|_| ())
            .map_err(|_| StoreError::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_read_none() {
        let store = MemoryStore::new();
        for key in SettingKey::ALL {
            assert_eq!(store.read(key), None);
            assert_eq!(store.read_int(key), None);
            assert_eq!(store.read_bool(key), None);
        }
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut store = MemoryStore::new();
        store.write_int(SettingKey::ForegroundColor, 0xFF0000).unwrap();
        store.write_int(SettingKey::ForegroundColor, 0x00FF00).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.read_int(SettingKey::ForegroundColor), Some(0x00FF00));
    }

    #[test]
    fn test_int_and_bool_interconvert() {
        let mut store = MemoryStore::new();
        store.write_int(SettingKey::StatusBar, 1).unwrap();
        assert_eq!(store.read_bool(SettingKey::StatusBar), Some(true));

        store.write_bool(SettingKey::StatusBar, false).unwrap();
        assert_eq!(store.read_int(SettingKey::StatusBar), Some(0));
    }

    #[test]
    fn test_snapshot_restores_entries() {
        let mut store = MemoryStore::new();
        store.write_int(SettingKey::BackgroundColor, 0x0055AA).unwrap();
        store.write_bool(SettingKey::StatusBar, true).unwrap();

        let bytes = store.to_bytes().unwrap();
        let restored = MemoryStore::from_bytes(&bytes).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.read_int(SettingKey::BackgroundColor), Some(0x0055AA));
        assert_eq!(restored.read_bool(SettingKey::StatusBar), Some(true));
        assert_eq!(restored.read(SettingKey::ForegroundColor), None);
    }

    #[test]
    fn test_garbage_snapshot_is_rejected() {
        let result = MemoryStore::from_bytes(&[0xFF, 0xFF, 0xFF]);
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[test]
    fn test_key_ids_round_trip() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_id(key.id()), Some(key));
        }
        assert_eq!(SettingKey::from_id(7), None);
    }
}
