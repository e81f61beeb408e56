//! Key-value persistence for local records
//!
//! Records are plain JSON strings under fixed keys. The backend is injected:
//! - `MemoryStorage`: native builds and tests
//! - `LocalStorage`: browser `window.localStorage` (wasm32 only)
//!
//! Writes are best-effort. Callers keep their in-memory state when a write
//! fails; the error is only reported.

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::consts::PROFILE_KEY;
use crate::profile::OperativeProfile;

#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage backend (e.g. LocalStorage disabled by the browser)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
    /// Stored record exists but does not parse
    #[error("invalid record under {key}: {source}")]
    InvalidProfileData {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value backend
pub trait KeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Load and parse a JSON record. Missing key is `Ok(None)`.
pub fn load_record<T, K>(backend: &K, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    K: KeyValue + ?Sized,
{
    let Some(json) = backend.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| StorageError::InvalidProfileData {
            key: key.to_string(),
            source,
        })
}

/// Serialize and store a whole record, replacing any previous value
pub fn save_record<T, K>(backend: &mut K, key: &str, record: &T) -> Result<(), StorageError>
where
    T: Serialize,
    K: KeyValue + ?Sized,
{
    let json = serde_json::to_string(record)?;
    backend.set(key, &json)
}

/// Persistence capability for the operative profile
pub trait ProfileStore {
    fn load(&self) -> Result<Option<OperativeProfile>, StorageError>;
    fn save(&mut self, profile: &OperativeProfile) -> Result<(), StorageError>;
}

impl<K: KeyValue> ProfileStore for K {
    fn load(&self) -> Result<Option<OperativeProfile>, StorageError> {
        load_record(self, PROFILE_KEY)
    }

    fn save(&mut self, profile: &OperativeProfile) -> Result<(), StorageError> {
        save_record(self, PROFILE_KEY, profile)
    }
}

/// In-process backend
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValue for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
