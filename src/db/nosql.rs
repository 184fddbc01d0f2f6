//! Document-style activity log.
//!
//! The whole log is one JSON array stored under a single key, newest entry
//! first, truncated to a fixed capacity on every insert.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::ActivityLog;
use crate::storage::{get_json, update_json, LocalStorage, StorageError};

/// Storage key holding the log array
pub const LOG_COLLECTION: &str = "yann_note_admin_logs";

/// Entries kept before the oldest are evicted; also the largest capacity
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Bounded, append-only activity log
pub struct ActivityLogStore {
    storage: Arc<dyn LocalStorage>,
    collection: String,
    capacity: usize,
}

impl ActivityLogStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self::with_capacity(storage, DEFAULT_LOG_CAPACITY)
    }

    /// Log keeping `capacity` entries, clamped to `1..=DEFAULT_LOG_CAPACITY`
    pub fn with_capacity(storage: Arc<dyn LocalStorage>, capacity: usize) -> Self {
        Self {
            storage,
            collection: LOG_COLLECTION.to_string(),
            capacity: capacity.clamp(1, DEFAULT_LOG_CAPACITY),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record an action. Older entries past the capacity are dropped.
    ///
    /// The prepend happens inside one storage update, so concurrent inserts
    /// never overwrite each other. Write failures (quota, IO) are returned
    /// as-is, without retry.
    pub fn insert_log(
        &self,
        action: &str,
        metadata: Value,
    ) -> Result<ActivityLog, StorageError> {
        let entry = ActivityLog::new(action, metadata);
        let capacity = self.capacity;
        let head = entry.clone();

        update_json(
            self.storage.as_ref(),
            &self.collection,
            move |current: Option<Vec<ActivityLog>>| {
                let mut logs = Vec::with_capacity(capacity + 1);
                logs.push(head);
                logs.extend(current.unwrap_or_default());
                logs.truncate(capacity);
                logs
            },
        )?;

        tracing::debug!(
            "[NoSQL INSERT]: {{ action: \"{}\", meta: {} }}",
            entry.action,
            entry.metadata
        );
        Ok(entry)
    }

    /// Stored entries, newest first. A corrupted array is discarded.
    pub fn get_logs(&self) -> Result<Vec<ActivityLog>, StorageError> {
        Ok(get_json(self.storage.as_ref(), &self.collection)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actions;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn store_with(capacity: usize) -> (ActivityLogStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = ActivityLogStore::with_capacity(storage.clone(), capacity);
        (store, storage)
    }

    #[test]
    fn test_insert_newest_first() {
        let (store, _) = store_with(DEFAULT_LOG_CAPACITY);
        store.insert_log(actions::UPLOAD_BATCH, json!({"count": 1})).unwrap();
        store.insert_log(actions::ADMIN_LOGOUT, Value::Null).unwrap();

        let logs = store.get_logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, actions::ADMIN_LOGOUT);
        assert_eq!(logs[1].metadata, json!({"count": 1}));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let (store, _) = store_with(3);
        for i in 0..5 {
            store.insert_log(&format!("ACTION_{}", i), Value::Null).unwrap();
        }

        let logs = store.get_logs().unwrap();
        let actions: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
        assert_eq!(actions, vec!["ACTION_4", "ACTION_3", "ACTION_2"]);
    }

    #[test]
    fn test_malformed_log_is_discarded() {
        let (store, storage) = store_with(DEFAULT_LOG_CAPACITY);
        storage.set_item(LOG_COLLECTION, "[{\"oops\"").unwrap();

        assert!(store.get_logs().unwrap().is_empty());
        assert!(storage.get_item(LOG_COLLECTION).unwrap().is_none());

        store.insert_log(actions::ADMIN_ACCESS_DASHBOARD, Value::Null).unwrap();
        assert_eq!(store.get_logs().unwrap().len(), 1);
    }

    #[test]
    fn test_quota_error_is_surfaced() {
        let storage = Arc::new(MemoryStorage::with_quota(16));
        let store = ActivityLogStore::new(storage);

        let err = store
            .insert_log(actions::UPLOAD_BATCH, json!({"count": 3}))
            .unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_capacity_is_clamped() {
        let (store, _) = store_with(100);
        assert_eq!(store.capacity(), DEFAULT_LOG_CAPACITY);
        for i in 0..80 {
            store.insert_log(&format!("ACTION_{}", i), Value::Null).unwrap();
        }
        assert_eq!(store.get_logs().unwrap().len(), DEFAULT_LOG_CAPACITY);

        let (store, _) = store_with(0);
        assert_eq!(store.capacity(), 1);
        store.insert_log(actions::ADMIN_LOGOUT, Value::Null).unwrap();
        assert_eq!(store.get_logs().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_inserts_are_all_kept() {
        let (store, _) = store_with(DEFAULT_LOG_CAPACITY);
        let store = Arc::new(store);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        store
                            .insert_log(actions::UPLOAD_BATCH, json!({ "thread": t, "i": i }))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_logs().unwrap().len(), 40);
    }
}
