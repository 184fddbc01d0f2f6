//! File-backed storage: a single JSON object on disk.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{ItemUpdate, LocalStorage, StorageError};

/// File name used inside the configured home directory
pub const STORAGE_FILE_NAME: &str = "local_storage.json";

/// Persistent storage at `<home>/local_storage.json`.
///
/// Reads hold a shared lock on the file. Every write takes an exclusive
/// lock, re-reads the map and rewrites it, so several processes can share
/// one home.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

type ItemMap = BTreeMap<String, String>;

impl FileStorage {
    /// Storage file inside `home` (created lazily on first write)
    pub fn in_dir(home: impl AsRef<Path>) -> Self {
        Self {
            path: home.as_ref().join(STORAGE_FILE_NAME),
        }
    }

    /// Path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<ItemMap, StorageError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ItemMap::new()),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(parse_map(&content, &self.path))
    }

    /// Apply `update` to the stored map under an exclusive file lock.
    ///
    /// The file is rewritten only when `update` returns `Ok(true)`.
    fn update_map<F>(&self, update: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut ItemMap) -> Result<bool, StorageError>,
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        let mut map = parse_map(&content, &self.path);

        if update(&mut map)? {
            write_map(&mut file, &map)?;
        }

        // Lock is released when file is dropped
        Ok(())
    }
}

fn parse_map(content: &str, path: &Path) -> ItemMap {
    if content.trim().is_empty() {
        return ItemMap::new();
    }

    serde_json::from_str(content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Storage file unreadable, starting empty");
        ItemMap::new()
    })
}

fn write_map(file: &mut File, map: &ItemMap) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(map)?;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    Ok(())
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tracing::debug!(key, bytes = value.len(), "storage set");
        self.update_map(|map| {
            map.insert(key.to_string(), value.to_string());
            Ok(true)
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }

        tracing::debug!(key, "storage remove");
        self.update_map(|map| Ok(map.remove(key).is_some()))
    }

    fn update_item(&self, key: &str, update: ItemUpdate<'_>) -> Result<(), StorageError> {
        self.update_map(|map| match update(map.get(key).cloned())? {
            Some(value) => {
                tracing::debug!(key, bytes = value.len(), "storage update");
                map.insert(key.to_string(), value);
                Ok(true)
            }
            None => Ok(map.remove(key).is_some()),
        })
    }
}
