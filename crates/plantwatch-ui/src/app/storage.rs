//! `localStorage` backend.

use gloo::utils::window;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::DomException;

use crate::core::storage::{StorageBackend, StorageError};

/// Browser `localStorage`, when the page is allowed to use it.
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    raw: web_sys::Storage,
}

impl BrowserStorage {
    /// Open `localStorage`; `None` when it is disabled or unavailable.
    #[must_use]
    pub fn local() -> Option<Self> {
        window()
            .local_storage()
            .ok()
            .flatten()
            .map(|raw| Self { raw })
    }
}

fn js_error(operation: &'static str, err: &JsValue) -> StorageError {
    if let Some(exception) = err.dyn_ref::<DomException>() {
        if exception.name() == "QuotaExceededError" {
            return StorageError::QuotaExceeded;
        }
        return StorageError::backend(operation, exception.message());
    }
    StorageError::backend(operation, format!("{err:?}"))
}

impl StorageBackend for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.raw.get_item(key).map_err(|err| js_error("read", &err))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.raw
            .set_item(key, value)
            .map_err(|err| js_error("write", &err))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.raw
            .remove_item(key)
            .map_err(|err| js_error("delete", &err))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let length = self.raw.length().map_err(|err| js_error("keys", &err))?;
        let mut keys = Vec::with_capacity(length as usize);
        for index in 0..length {
            if let Some(key) = self.raw.key(index).map_err(|err| js_error("keys", &err))? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
