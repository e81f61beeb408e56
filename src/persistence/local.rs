//! Browser LocalStorage backend

use super::{KeyValue, StorageError};

/// `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's LocalStorage. Fails when the browser denies access
    /// (private mode, disabled storage) or there is no window.
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValue for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }
}
