use blog_client::{SessionStorage, StorageError};

/// Хранилище сессии в `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LocalStorage;

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window()
        .ok_or_else(|| StorageError::Unavailable("window is not available".to_string()))?;
    window
        .local_storage()
        .map_err(|_| StorageError::Unavailable("failed to access localStorage".to_string()))?
        .ok_or_else(|| StorageError::Unavailable("localStorage is not available".to_string()))
}

fn blank_to_none(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

impl SessionStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let raw = local_storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable(format!("failed to read {key}")))?;
        Ok(blank_to_none(raw))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Unavailable(format!("failed to save {key}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        local_storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Unavailable(format!("failed to clear {key}")))
    }
}
