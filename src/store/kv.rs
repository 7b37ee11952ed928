//! String key-value persistence with failure swallowing.
//!
//! A [`StorageBackend`] reports failures honestly; [`KvStore`] sits on top and
//! turns every failure into a console warning plus a fallback value, so callers
//! above this layer never see a storage error.

use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

use crate::console;

#[derive(Debug, Error, PartialEq)]
pub enum StorageError {
    /// No storage object (private mode, sandboxed iframe, host build).
    #[error("storage is unavailable")]
    Unavailable,
    /// The backend threw, e.g. a quota error on write.
    #[error("storage operation failed: {0}")]
    Backend(String),
}

pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process backend; also what the app falls back to off the browser.
#[derive(Default)]
pub struct MemoryBackend {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`, looked up per call so a storage that appears or
/// disappears mid-session is handled.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageBackend;

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(s)) => Ok(s),
            Ok(None) => Err(StorageError::Unavailable),
            Err(e) => Err(StorageError::Backend(format!("{e:?}"))),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }
}

/// The never-failing store handed to every persistent component.
pub struct KvStore {
    backend: Box<dyn StorageBackend>,
}

impl KvStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// localStorage in the browser, memory elsewhere.
    pub fn browser() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::new(Box::new(LocalStorageBackend))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::in_memory()
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(v) => v,
            Err(e) => {
                console::warn(&format!("{key} の読み込みに失敗: {e}"));
                None
            }
        }
    }

    pub fn get_or(&self, key: &str, fallback: &str) -> String {
        self.get(key).unwrap_or_else(|| fallback.to_string())
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set_item(key, value) {
            console::warn(&format!("{key} の保存に失敗: {e}"));
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            console::warn(&format!("{key} の削除に失敗: {e}"));
        }
    }
}

#[cfg(test)]
pub mod failing {
    use super::{StorageBackend, StorageError};

    /// Every call fails, like a browser with storage disabled.
    pub struct FailingBackend;

    impl StorageBackend for FailingBackend {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("QuotaExceededError".into()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }
}
