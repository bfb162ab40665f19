//! Key-value persistence for the board.
//!
//! Three independent slots hold the note list, the connector list (both JSON)
//! and the background data URI (stored raw). Slots are read once at startup
//! and rewritten whenever an [`Action`] touches them. Reads and writes are
//! best-effort: failures are logged and the in-memory scene stays
//! authoritative.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

use crate::config::StorageKeys;
use crate::doc::{BackgroundImage, Connector, DocStore, Note, Snapshot};
use crate::engine::Action;

/// Error returned by storage reads and writes.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The browser has no usable `localStorage` (private mode, disabled, SSR).
    #[error("local storage is unavailable")]
    Unavailable,
    /// The browser rejected the call, e.g. quota exceeded.
    #[error("storage call failed: {0}")]
    Js(String),
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<JsValue> for StorageError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// A string key-value store.
pub trait KeyValueStore {
    /// Read a slot. `Ok(None)` means the slot is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Deleting an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the removal.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// The browser's `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window or
    /// storage access is denied.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) | Err(_) => Err(StorageError::Unavailable),
        }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.storage.get_item(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.storage.set_item(key, value)?)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        Ok(self.storage.remove_item(key)?)
    }
}

/// Reads and writes the board's three slots on top of a [`KeyValueStore`].
pub struct BoardStorage<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> BoardStorage<S> {
    #[must_use]
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read every slot. Absent, unreadable or malformed slots fall back to
    /// their defaults: starter notes, no connectors, no background.
    #[must_use]
    pub fn load(&self) -> Snapshot {
        let notes = self.read_json::<Vec<Note>>(&self.keys.notes);
        let connectors = self.read_json::<Vec<Connector>>(&self.keys.connectors).unwrap_or_default();
        let background = self.read_raw(&self.keys.background).and_then(|raw| {
            match BackgroundImage::from_data_uri(raw) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("storage: ignoring {}: {e}", self.keys.background);
                    None
                }
            }
        });
        Snapshot { notes, connectors, background }
    }

    /// Write the note list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_notes(&mut self, notes: &[Note]) -> Result<(), StorageError> {
        let key = self.keys.notes.clone();
        self.write_json(&key, notes)
    }

    /// Write the connector list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_connectors(&mut self, connectors: &[Connector]) -> Result<(), StorageError> {
        let key = self.keys.connectors.clone();
        self.write_json(&key, connectors)
    }

    /// Write the background, or remove its slot when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_background(&mut self, background: Option<&BackgroundImage>) -> Result<(), StorageError> {
        match background {
            Some(image) => self.store.set(&self.keys.background, image.as_str()),
            None => self.store.remove(&self.keys.background),
        }
    }

    /// Persist the slots touched by `actions` from the current scene.
    ///
    /// Each slot is written at most once. Failures are logged and skipped.
    pub fn write_through(&mut self, actions: &[Action], doc: &DocStore) {
        if actions.iter().any(Action::touches_notes) {
            if let Err(e) = self.save_notes(doc.notes()) {
                log::warn!("storage: failed to save notes: {e}");
            }
        }
        if actions.iter().any(Action::touches_connectors) {
            if let Err(e) = self.save_connectors(doc.connectors()) {
                log::warn!("storage: failed to save connectors: {e}");
            }
        }
        if actions.iter().any(Action::touches_background) {
            if let Err(e) = self.save_background(doc.background()) {
                log::warn!("storage: failed to save background: {e}");
            }
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("storage: failed to read {key}: {e}");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("storage: malformed {key}, using default: {e}");
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|source| StorageError::Serialize { key: key.to_owned(), source })?;
        self.store.set(key, &raw)
    }
}
