//! Current-mode state with durable persistence.
//!
//! # Design
//! - The controller owns the mode; the token tree is rebuilt and swapped as a
//!   whole on every change so readers never see a partial update.
//! - Storage failures are logged and ignored; the in-memory mode stays authoritative.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::{Theme, ThemeMode, create_theme};

/// Storage key holding the persisted mode.
pub const THEME_STORAGE_KEY: &str = "theme-mode";

/// Error raised by a [`PreferenceStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backing storage could not be reached.
    #[error("preference storage unavailable")]
    Unavailable {
        /// Backend-specific detail.
        detail: String,
    },
}

/// Durable key/value storage (browser local storage, a config file, ...).
pub trait PreferenceStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the storage backend is unavailable.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the storage backend is unavailable.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// In-process [`PreferenceStore`] for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a persisted mode.
    #[must_use]
    pub fn with_mode(mode: ThemeMode) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(THEME_STORAGE_KEY.to_string(), mode.as_str().to_string());
        }
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|err| StoreError::Unavailable {
            detail: err.to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|err| StoreError::Unavailable {
            detail: err.to_string(),
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Owner of the application's current [`ThemeMode`] and its token tree.
#[derive(Debug)]
pub struct ThemeController<S> {
    store: S,
    mode: ThemeMode,
    theme: Arc<Theme>,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Restore the persisted mode, defaulting to [`ThemeMode::Light`].
    pub fn load(store: S) -> Self {
        let mode = match store.read(THEME_STORAGE_KEY) {
            Ok(Some(value)) => ThemeMode::parse(&value),
            Ok(None) => ThemeMode::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted theme mode");
                ThemeMode::default()
            }
        };
        Self {
            store,
            mode,
            theme: Arc::new(create_theme(mode)),
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Shared handle to the current token tree.
    #[must_use]
    pub fn theme(&self) -> Arc<Theme> {
        Arc::clone(&self.theme)
    }

    /// Switch to `mode`, replace the token tree and persist the choice.
    pub fn set_mode(&mut self, mode: ThemeMode) -> Arc<Theme> {
        if mode != self.mode {
            self.mode = mode;
            self.theme = Arc::new(create_theme(mode));
        }
        if let Err(err) = self.store.write(THEME_STORAGE_KEY, mode.as_str()) {
            tracing::warn!(error = %err, mode = mode.as_str(), "failed to persist theme mode");
        }
        self.theme()
    }

    /// Flip between light and dark, returning the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        self.set_mode(self.mode.toggle());
        self.mode
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}
