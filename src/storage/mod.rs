//! Local key/value storage.
//!
//! Mirrors the browser's `localStorage`: string keys, string values that
//! hold plain JSON, no versioning. Two backends:
//! - [`FileStorage`]: one JSON object persisted at `<home>/local_storage.json`
//! - [`MemoryStorage`]: process-local, optionally with a byte quota

pub mod file;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded writing '{key}': {size} bytes (quota {quota})")]
    QuotaExceeded { key: String, size: usize, quota: usize },

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Computes the new value of a key from its current one; `None` removes it
pub type ItemUpdate<'a> =
    Box<dyn FnOnce(Option<String>) -> Result<Option<String>, StorageError> + 'a>;

/// Minimal `localStorage`-like interface
pub trait LocalStorage: Send + Sync {
    /// Read the raw value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` if present
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Read-modify-write of `key` with no other write in between.
    ///
    /// If `update` fails, the stored value is left untouched.
    fn update_item(&self, key: &str, update: ItemUpdate<'_>) -> Result<(), StorageError>;
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding malformed stored value");
            None
        }
    }
}

/// Read and decode a JSON value.
///
/// A value that does not decode is discarded: the key is removed and
/// `None` is returned.
pub fn get_json<T: DeserializeOwned>(
    storage: &dyn LocalStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };

    match decode(key, &raw) {
        Some(value) => Ok(Some(value)),
        None => {
            storage.remove_item(key)?;
            Ok(None)
        }
    }
}

/// Encode `value` as JSON and store it under `key`
pub fn set_json<T: Serialize + ?Sized>(
    storage: &dyn LocalStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, &raw)
}

/// Replace the JSON value under `key` with `update(current)`, atomically.
///
/// A stored value that does not decode is handed to `update` as `None`.
pub fn update_json<T, F>(storage: &dyn LocalStorage, key: &str, update: F) -> Result<(), StorageError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(Option<T>) -> T,
{
    storage.update_item(
        key,
        Box::new(move |raw: Option<String>| -> Result<Option<String>, StorageError> {
            let current = raw.and_then(|raw| decode(key, &raw));
            Ok(Some(serde_json::to_string(&update(current))?))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_json_discards_malformed_value() {
        let storage = MemoryStorage::new();
        storage.set_item("broken", "{not json").unwrap();

        let value: Option<Vec<String>> = get_json(&storage, "broken").unwrap();
        assert!(value.is_none());
        assert!(storage.get_item("broken").unwrap().is_none());
    }

    #[test]
    fn test_json_roundtrip_through_storage() {
        let storage = MemoryStorage::new();
        set_json(&storage, "list", &vec!["a", "b"]).unwrap();

        let value: Option<Vec<String>> = get_json(&storage, "list").unwrap();
        assert_eq!(value, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_update_json_starts_over_on_malformed_value() {
        let storage = MemoryStorage::new();
        storage.set_item("list", "[1, 2").unwrap();

        update_json(&storage, "list", |current: Option<Vec<u32>>| {
            assert!(current.is_none());
            vec![7]
        })
        .unwrap();
        update_json(&storage, "list", |current: Option<Vec<u32>>| {
            let mut list = current.unwrap_or_default();
            list.push(8);
            list
        })
        .unwrap();

        assert_eq!(storage.get_item("list").unwrap().as_deref(), Some("[7,8]"));
    }

    #[test]
    fn test_get_json_missing_key() {
        let storage = MemoryStorage::new();
        let value: Option<u32> = get_json(&storage, "nothing").unwrap();
        assert!(value.is_none());
    }
}
