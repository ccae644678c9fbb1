//! Durable key-value storage for schedules and sync progress.
//!
//! Values are JSON strings so any store that holds text can back the
//! synchronizer. Typed access goes through [`load_value`] and [`save_value`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scheduler_logging::{sched_debug, sched_warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

/// Keys used by the synchronizer.
pub mod keys {
    pub const WEEKLY_SCHEDULE: &str = "weeklySchedule";
    pub const EXAM_SCHEDULE: &str = "examSchedule";
    pub const SYNC_STATE: &str = "termSyncState";
    pub const PENDING_SYNC: &str = "pendingTermSync";
    pub const SELECTED_TERM: &str = "selectedTerm";

    pub const ALL: [&str; 5] = [
        WEEKLY_SCHEDULE,
        EXAM_SCHEDULE,
        SYNC_STATE,
        PENDING_SYNC,
        SELECTED_TERM,
    ];
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("failed to write store: {0}")]
    Write(#[from] PersistError),
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] ron::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Reads and decodes `key`. Missing keys, unreadable stores and values that
/// do not decode are all reported as `None`; the last two are logged.
pub fn load_value<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(err) => {
            sched_warn!("could not read {}: {}", key, err);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            sched_warn!("ignoring corrupt value for {}: {}", key, err);
            None
        }
    }
}

pub fn save_value<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, raw)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store kept in one `.ron` file. Every change rewrites the file atomically.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    writer: AtomicFileWriter,
    file_name: String,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| StoreError::Corrupt {
                path: path.clone(),
                message: "store path has no file name".to_string(),
            })?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let entries = read_entries(&path)?;
        sched_debug!("opened store {} with {} keys", path.display(), entries.len());
        Ok(Self {
            writer: AtomicFileWriter::new(dir),
            path,
            file_name,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let pretty = ron::ser::PrettyConfig::new();
        let text = ron::ser::to_string_pretty(&self.entries, pretty)?;
        self.writer.write(&self.file_name, text)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&text).map_err(|err| StoreError::Corrupt {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
