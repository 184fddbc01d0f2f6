//! In-process storage backend.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{ItemUpdate, LocalStorage, StorageError};

/// Storage that lives as long as the process.
///
/// An optional quota bounds the total size of keys plus values, the way
/// browsers cap `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys and values exceed `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_quota(
        &self,
        items: &HashMap<String, String>,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let Some(quota) = self.quota else {
            return Ok(());
        };

        let others: usize = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        let size = others + key.len() + value.len();
        if size > quota {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size,
                quota,
            });
        }
        Ok(())
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        self.check_quota(&items, key, value)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }

    fn update_item(&self, key: &str, update: ItemUpdate<'_>) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;

        match update(items.get(key).cloned())? {
            Some(value) => {
                self.check_quota(&items, key, &value)?;
                items.insert(key.to_string(), value);
            }
            None => {
                items.remove(key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));

        storage.remove_item("k").unwrap();
        assert!(storage.get_item("k").unwrap().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("a", "12345").unwrap();

        let err = storage.set_item("b", "123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 10, .. }));

        // Previous value untouched
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("12345"));
        assert!(storage.get_item("b").unwrap().is_none());
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(6);
        storage.set_item("a", "12345").unwrap();
        storage.set_item("a", "54321").unwrap();
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_update_item_sees_every_concurrent_write() {
        let storage = Arc::new(MemoryStorage::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = storage.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        storage
                            .update_item(
                                "counter",
                                Box::new(|current: Option<String>| {
                                    let n: u32 = current.map_or(0, |v| v.parse().unwrap());
                                    Ok(Some((n + 1).to_string()))
                                }),
                            )
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.get_item("counter").unwrap().as_deref(), Some("200"));
    }

    #[test]
    fn test_update_item_none_removes_and_quota_applies() {
        let storage = MemoryStorage::with_quota(8);
        storage.set_item("k", "v").unwrap();

        let err = storage
            .update_item("k", Box::new(|_: Option<String>| Ok(Some("0123456789".to_string()))))
            .unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));

        storage.update_item("k", Box::new(|_: Option<String>| Ok(None))).unwrap();
        assert!(storage.is_empty());
    }
}
