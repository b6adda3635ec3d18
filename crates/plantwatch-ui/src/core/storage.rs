//! Prefix-namespaced JSON persistence over an injected backend.
//!
//! # Design
//! - Backends are capabilities: the browser injects `localStorage`, the CLI a
//!   state directory, tests an in-memory map, and contexts without a durable
//!   medium a [`NoopStorage`].
//! - [`PersistentStore`] never fails outward. Problems are logged and surface
//!   as `false` or the caller's default.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use plantwatch_config::ClientConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, warn};

/// Failures raised by a [`StorageBackend`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// No durable medium exists in this execution context.
    #[error("storage is unavailable in this context")]
    Unavailable,
    /// The medium refused the write for lack of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// Any other backend failure.
    #[error("storage backend failed during {operation}")]
    Backend {
        /// Operation that failed (`read`, `write`, `delete`, `keys`).
        operation: &'static str,
        /// Backend-specific detail.
        detail: String,
    },
}

impl StorageError {
    /// Wrap a backend-specific failure.
    pub fn backend(operation: &'static str, detail: impl fmt::Display) -> Self {
        Self::Backend {
            operation,
            detail: detail.to_string(),
        }
    }
}

/// Raw string key-value medium.
pub trait StorageBackend {
    /// Stored text for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the medium cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the medium refuses the write.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the medium cannot be modified.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Every key currently stored, regardless of prefix.
    ///
    /// # Errors
    ///
    /// Returns an error when the medium cannot be enumerated.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-process backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text, bypassing any prefix.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

/// Backend for contexts without durable storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStorage;

impl StorageBackend for NoopStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(Vec::new())
    }
}

/// Default namespace prefix.
pub const DEFAULT_PREFIX: &str = "app_";
/// Default ceiling for a serialised value, in UTF-16 code units.
pub const DEFAULT_MAX_CHARS: usize = 5_000_000;

/// JSON store that namespaces every key and swallows backend failures.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Rc<dyn StorageBackend>,
    prefix: Rc<str>,
    max_chars: usize,
}

impl PersistentStore {
    /// Store with an explicit prefix and size ceiling.
    pub fn new(backend: Rc<dyn StorageBackend>, prefix: &str, max_chars: usize) -> Self {
        Self {
            backend,
            prefix: Rc::from(prefix),
            max_chars,
        }
    }

    /// Store with the default prefix and size ceiling.
    pub fn with_defaults(backend: Rc<dyn StorageBackend>) -> Self {
        Self::new(backend, DEFAULT_PREFIX, DEFAULT_MAX_CHARS)
    }

    /// Store configured from [`ClientConfig`].
    pub fn from_config(config: &ClientConfig, backend: Rc<dyn StorageBackend>) -> Self {
        Self::new(backend, &config.storage_prefix, config.storage_max_chars)
    }

    /// Namespace prefix applied to every key.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Decoded value for `key`; `None` when missing or unreadable.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.read(&self.full_key(key)) {
            Ok(raw) => raw?,
            Err(err) => {
                error!(key, error = %err, "failed to read from storage");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(key, error = %err, "discarding unparseable stored value");
                None
            }
        }
    }

    /// Decoded value for `key`, or `default` when missing or unreadable.
    #[must_use]
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Whether an entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.read(&self.full_key(key)), Ok(Some(_)))
    }

    /// Serialise and store `value`. Returns `false` when the value is too
    /// large, cannot be serialised, or the backend refuses it.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(err) => {
                error!(key, error = %err, "failed to serialise value for storage");
                return false;
            }
        };
        let size = serialized.encode_utf16().count();
        if size > self.max_chars {
            warn!(key, size, limit = self.max_chars, "storage value too large");
            return false;
        }
        match self.backend.write(&self.full_key(key), &serialized) {
            Ok(()) => true,
            Err(StorageError::QuotaExceeded) => {
                error!(key, "storage quota exceeded");
                false
            }
            Err(err) => {
                error!(key, error = %err, "failed to write to storage");
                false
            }
        }
    }

    /// Delete the entry for `key`.
    pub fn remove(&self, key: &str) {
        if let Err(err) = self.backend.delete(&self.full_key(key)) {
            error!(key, error = %err, "failed to remove from storage");
        }
    }

    /// Delete every entry carrying this store's prefix. Foreign keys survive.
    pub fn clear(&self) {
        let keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(err) => {
                error!(error = %err, "failed to enumerate storage");
                return;
            }
        };
        for key in keys.iter().filter(|key| key.starts_with(&*self.prefix)) {
            if let Err(err) = self.backend.delete(key) {
                error!(key = %key, error = %err, "failed to clear storage entry");
            }
        }
    }
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore")
            .field("prefix", &self.prefix)
            .field("max_chars", &self.max_chars)
            .finish_non_exhaustive()
    }
}
