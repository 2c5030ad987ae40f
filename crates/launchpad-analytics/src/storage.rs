//! Session-scoped key/value storage.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Session storage key holding the JSON-encoded attribution parameters.
pub const UTM_STORAGE_KEY: &str = "utm_params";

/// Error raised by a [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Storage is disabled or inaccessible (private mode, sandboxed frame, ...).
    #[error("session storage unavailable")]
    Unavailable {
        /// Backend-specific detail.
        detail: String,
    },
}

/// Storage that lives for one browsing session.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the storage backend is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the storage backend is unavailable.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process [`SessionStore`].
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|err| StorageError::Unavailable {
            detail: err.to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|err| StorageError::Unavailable {
            detail: err.to_string(),
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// [`SessionStore`] that always fails, mirroring browsers with storage disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSessionStore;

impl SessionStore for UnavailableSessionStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable {
            detail: "storage disabled".to_string(),
        })
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable {
            detail: "storage disabled".to_string(),
        })
    }
}
