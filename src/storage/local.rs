// window.localStorage backed store
use super::KeyValueStore;
use crate::error::{js_message, Result, WidgetError};
use web_sys::Storage;

/// Browser `localStorage`.
///
/// The handle is resolved once in `new()`. Individual calls can still throw
/// (quota exceeded, privacy mode); those surface as `WidgetError::Storage`.
#[derive(Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Resolve `window.localStorage`.
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| WidgetError::Storage("No window object".into()))?;

        let storage = window
            .local_storage()
            .map_err(|e| WidgetError::Storage(format!("localStorage not available: {}", js_message(&e))))?
            .ok_or_else(|| WidgetError::Storage("localStorage not supported".into()))?;

        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| WidgetError::Storage(format!("getItem({}) failed: {}", key, js_message(&e))))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| WidgetError::Storage(format!("setItem({}) failed: {}", key, js_message(&e))))
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| WidgetError::Storage(format!("removeItem({}) failed: {}", key, js_message(&e))))
    }
}
