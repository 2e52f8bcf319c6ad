//! Key-value storage port backing the record ledger
//!
//! This module provides a single trait `StorageBackend` and two concrete
//! implementations:
//!
//! - `MemoryStorage` — a mutexed in-memory map, deterministic for tests and
//!   suitable for hosts that persist elsewhere.
//! - `FileStorage` — stores a single JSON file containing a map of string
//!   keys to string values, located in a per-user configuration directory
//!   and read/written synchronously.
//!
//! The abstraction exposes string-level APIs and convenient `save_json` /
//! `load_json` helpers that use `serde` for structured data. The ledger
//! talks to the trait only, so it can persist to either backend.

use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Platform storage error: {0}")]
    Platform(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Simple generic storage backend trait.
///
/// Keys and values are UTF-8 strings. Higher-level helpers like `save_json`
/// and `load_json` are implemented in terms of these primitives.
pub trait StorageBackend: Send + Sync {
    /// Store a string value for a key.
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Read a string value for a key. Returns Ok(None) when key is missing.
    fn get_string(&self, key: &str) -> StorageResult<Option<String>>;

    /// Remove a key (no-op if key does not exist).
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Serialize `value` as JSON and store it under `key`.
pub fn save_json<T: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    match serde_json::to_string(value) {
        Ok(s) => backend.set_string(key, &s),
        Err(e) => Err(StorageError::Json(e.to_string())),
    }
}

/// Load and deserialize the JSON value stored under `key`, if any.
pub fn load_json<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> StorageResult<Option<T>> {
    match backend.get_string(key)? {
        Some(s) => match serde_json::from_str::<T>(&s) {
            Ok(v) => Ok(Some(v)),
            Err(e) => Err(StorageError::Json(e.to_string())),
        },
        None => Ok(None),
    }
}

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Platform(format!("mutex poisoned: {:?}", e)))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Platform(format!("mutex poisoned: {:?}", e)))?;
        Ok(guard.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Platform(format!("mutex poisoned: {:?}", e)))?;
        guard.remove(key);
        Ok(())
    }
}

/// File-based storage: stores a single JSON file which is a map of key -> string value.
///
/// Implementation notes:
/// - On init, file is read into memory (HashMap).
/// - Mutations update memory and flush the file back to disk synchronously.
pub struct FileStorage {
    /// Path to the backing JSON file.
    path: PathBuf,
    /// In-memory copy of key -> value
    inner: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Determine a good default storage file path for the current user.
    /// Uses environment variables when available:
    /// - On Windows: %APPDATA%/TrackRecords/storage.json
    /// - Else: $HOME/.config/track-records/storage.json
    fn default_storage_path() -> PathBuf {
        // Prefer APPDATA on Windows
        if cfg!(windows)
            && let Ok(appdata) = std::env::var("APPDATA")
        {
            return Path::new(&appdata).join("TrackRecords").join("storage.json");
        }

        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home)
                .join(".config")
                .join("track-records")
                .join("storage.json");
        }

        // Fallback to current directory
        Path::new(".").join("track-records-storage.json")
    }

    pub fn new_with_path(path: Option<PathBuf>) -> StorageResult<Self> {
        let path = path.unwrap_or_else(Self::default_storage_path);

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            return Err(StorageError::Io(format!(
                "Failed to create storage parent directory: {}",
                e
            )));
        }

        // Read file if present
        let mut map: HashMap<String, String> = HashMap::new();
        if path.exists() {
            let mut file = fs::File::open(&path)
                .map_err(|e| StorageError::Io(format!("Failed to open storage file: {}", e)))?;
            let mut s = String::new();
            file.read_to_string(&mut s)
                .map_err(|e| StorageError::Io(format!("Failed to read storage file: {}", e)))?;
            if !s.trim().is_empty() {
                match serde_json::from_str::<HashMap<String, String>>(&s) {
                    Ok(m) => map = m,
                    Err(e) => {
                        return Err(StorageError::Json(format!(
                            "Failed to parse storage JSON: {}",
                            e
                        )));
                    }
                }
            }
        } else {
            let _ = fs::File::create(&path)
                .map_err(|e| StorageError::Io(format!("Failed to create storage file: {}", e)))?;
        }

        Ok(FileStorage {
            path,
            inner: Mutex::new(map),
        })
    }

    fn flush_locked(&self, locked: &HashMap<String, String>) -> StorageResult<()> {
        let s =
            serde_json::to_string_pretty(locked).map_err(|e| StorageError::Json(e.to_string()))?;
        fs::write(&self.path, s).map_err(|e| StorageError::Io(format!("write failed: {}", e)))
    }
}

impl StorageBackend for FileStorage {
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Platform(format!("mutex poisoned: {:?}", e)))?;
        guard.insert(key.to_string(), value.to_string());
        self.flush_locked(&guard)
    }

    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Platform(format!("mutex poisoned: {:?}", e)))?;
        Ok(guard.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Platform(format!("mutex poisoned: {:?}", e)))?;
        guard.remove(key);
        self.flush_locked(&guard)
    }
}
