//! Web Storage adapters for the theme and analytics stores.

use launchpad_analytics::{SessionStore, StorageError};
use launchpad_theme::{PreferenceStore, StoreError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

#[derive(Clone, Copy)]
enum Area {
    Local,
    Session,
}

fn storage(area: Area) -> Result<Storage, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let storage = match area {
        Area::Local => window.local_storage(),
        Area::Session => window.session_storage(),
    };
    storage
        .map_err(|err| describe(&err))?
        .ok_or_else(|| "storage disabled".to_string())
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn read(area: Area, key: &str) -> Result<Option<String>, String> {
    storage(area)?.get_item(key).map_err(|err| describe(&err))
}

fn write(area: Area, key: &str, value: &str) -> Result<(), String> {
    storage(area)?.set_item(key, value).map_err(|err| describe(&err))
}

/// `localStorage`-backed [`PreferenceStore`]; values are stored as raw strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPreferenceStore;

impl PreferenceStore for LocalPreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        read(Area::Local, key).map_err(|detail| StoreError::Unavailable { detail })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        write(Area::Local, key, value).map_err(|detail| StoreError::Unavailable { detail })
    }
}

/// `sessionStorage`-backed [`SessionStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSessionStore;

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        read(Area::Session, key).map_err(|detail| StorageError::Unavailable { detail })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        write(Area::Session, key, value).map_err(|detail| StorageError::Unavailable { detail })
    }
}
