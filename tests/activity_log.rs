//! Activity Log Integration Tests
//!
//! Tests for the capped log persisted in file-backed local storage.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use yannsnote::db::{ActivityLogStore, DEFAULT_LOG_CAPACITY, LOG_COLLECTION};
use yannsnote::storage::{FileStorage, LocalStorage};

fn file_store(temp: &TempDir) -> (ActivityLogStore, Arc<FileStorage>) {
    let storage = Arc::new(FileStorage::in_dir(temp.path()));
    (ActivityLogStore::new(storage.clone()), storage)
}

#[test]
fn test_log_never_exceeds_capacity() {
    let temp = TempDir::new().unwrap();
    let (logs, _) = file_store(&temp);

    for i in 0..(DEFAULT_LOG_CAPACITY + 25) {
        logs.insert_log("UPLOAD_BATCH", json!({ "count": i })).unwrap();
        assert!(logs.get_logs().unwrap().len() <= DEFAULT_LOG_CAPACITY);
    }

    let entries = logs.get_logs().unwrap();
    assert_eq!(entries.len(), 50);
    // Newest first; the 25 oldest were evicted
    assert_eq!(entries[0].metadata["count"], 74);
    assert_eq!(entries[49].metadata["count"], 25);
}

#[test]
fn test_log_survives_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let (logs, _) = file_store(&temp);
        logs.insert_log("ADMIN_ACCESS_DASHBOARD", json!({ "user": "admin" }))
            .unwrap();
    }

    let (logs, storage) = file_store(&temp);
    let entries = logs.get_logs().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "ADMIN_ACCESS_DASHBOARD");

    let raw = storage.get_item(LOG_COLLECTION).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(parsed.is_array());
}

#[test]
fn test_corrupted_log_is_discarded() {
    let temp = TempDir::new().unwrap();
    let (logs, storage) = file_store(&temp);
    storage.set_item(LOG_COLLECTION, "{not json").unwrap();

    assert!(logs.get_logs().unwrap().is_empty());
    assert!(storage.get_item(LOG_COLLECTION).unwrap().is_none());

    logs.insert_log("ADMIN_LOGOUT", json!({})).unwrap();
    assert_eq!(logs.get_logs().unwrap().len(), 1);
}

#[test]
fn test_concurrent_writers_lose_no_entries() {
    let temp = TempDir::new().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            // Separate store per thread, like separate CLI processes
            let (logs, _) = file_store(&temp);
            std::thread::spawn(move || {
                for i in 0..10 {
                    logs.insert_log("UPLOAD_BATCH", json!({ "thread": t, "i": i }))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let (logs, _) = file_store(&temp);
    let entries = logs.get_logs().unwrap();
    assert_eq!(entries.len(), 40);
    for t in 0..4 {
        let per_thread = entries
            .iter()
            .filter(|e| e.metadata["thread"] == t)
            .count();
        assert_eq!(per_thread, 10);
    }
}

#[test]
fn test_oversized_capacity_is_capped() {
    let temp = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::in_dir(temp.path()));
    let logs = ActivityLogStore::with_capacity(storage, 100);

    for i in 0..80 {
        logs.insert_log("DELETE_CONTENT", json!({ "contentId": i }))
            .unwrap();
    }
    assert_eq!(logs.get_logs().unwrap().len(), DEFAULT_LOG_CAPACITY);
}
