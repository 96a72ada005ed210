//! Local key/value storage
//!
//! [`FileStorageProvider`] keeps every key in one JSON file under the
//! platform config directory:
//! - Linux: ~/.config/chronoquest/player/storage.json
//! - macOS: ~/Library/Application Support/io.chronoquest.player/storage.json
//! - Windows: C:\Users\<User>\AppData\Roaming\chronoquest\player\config\storage.json

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::ports::outbound::StorageProvider;

const STORAGE_FILE: &str = "storage.json";

pub struct FileStorageProvider {
    storage_path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStorageProvider {
    /// Open storage in the platform config directory, falling back to the
    /// working directory when none is available.
    pub fn new() -> Self {
        let storage_path = match ProjectDirs::from("io", "chronoquest", "player") {
            Some(dirs) => dirs.config_dir().join(STORAGE_FILE),
            None => PathBuf::from("chronoquest_storage.json"),
        };
        Self::at(storage_path)
    }

    /// Open storage backed by `path`, loading whatever it already holds.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let storage_path = path.into();
        let cache = read_map(&storage_path);
        tracing::debug!(path = ?storage_path, keys = cache.len(), "Local storage initialized");
        Self {
            storage_path,
            cache: RwLock::new(cache),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    fn persist(&self) {
        if let Some(parent) = self.storage_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!(error = %e, "Failed to create storage directory");
                return;
            }
        }

        let data = match self.cache.read() {
            Ok(guard) => serde_json::to_string_pretty(&*guard),
            Err(e) => {
                tracing::error!(error = %e, "Failed to acquire read lock for storage");
                return;
            }
        };

        match data {
            Ok(data) => {
                if let Err(e) = fs::write(&self.storage_path, data) {
                    tracing::error!(error = %e, "Failed to write storage file");
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to serialize storage data"),
        }
    }
}

impl Default for FileStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn read_map(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to parse storage file");
            HashMap::new()
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read storage file");
            HashMap::new()
        }
    }
}

impl StorageProvider for FileStorageProvider {
    fn save(&self, key: &str, value: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.insert(key.to_string(), value.to_string());
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => tracing::error!(error = %e, "Failed to acquire write lock for storage"),
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to acquire read lock for storage");
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.remove(key);
                drop(guard);
                self.persist();
            }
            Err(e) => tracing::error!(error = %e, "Failed to acquire write lock for storage"),
        }
    }
}

/// Process-local storage; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorageProvider {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for MemoryStorageProvider {
    fn save(&self, key: &str, value: &str) {
        if let Ok(mut guard) = self.map.write() {
            guard.insert(key.to_string(), value.to_string());
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        self.map.read().ok().and_then(|g| g.get(key).cloned())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut guard) = self.map.write() {
            guard.remove(key);
        }
    }
}
