//! Key-value stores

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Store write failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("save data could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

/// A flat map from string keys to JSON values
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value);

    fn remove(&mut self, key: &str) -> Option<Value>;

    /// Drop every key
    fn clear(&mut self);

    /// Make pending writes durable
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    values: Map<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: MemoryStore,
}

impl JsonFileStore {
    /// Open a save file. A missing file gives an empty store; a file that is
    /// not a JSON object is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(values)) => {
                    log::info!("Loaded {} saved keys from {}", values.len(), path.display());
                    MemoryStore { values }
                }
                Ok(_) => {
                    log::warn!("Save {} is not a JSON object - starting fresh", path.display());
                    MemoryStore::new()
                }
                Err(e) => {
                    log::warn!("Save {} is corrupt: {} - starting fresh", path.display(), e);
                    MemoryStore::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No save at {}, starting fresh", path.display());
                MemoryStore::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_owned();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.set(key, value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    /// Write to a temporary file, then rename it over the save
    fn flush(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values.values)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Saved {} keys to {}", self.values.len(), self.path.display());
        Ok(())
    }
}
