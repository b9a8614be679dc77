// Collection persistence module
// Loads and saves the whole record collection as one JSON document

use super::record::Collection;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

/// Error types for persistence operations
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The backing document could not be read
    #[error("failed to read {location}: {source}")]
    Read {
        /// Where the store tried to read from
        location: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not a JSON array of objects
    #[error("failed to parse {location}: {source}")]
    Parse {
        /// Where the document was read from
        location: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be written back
    #[error("failed to write {location}: {reason}")]
    Write {
        /// Where the store tried to write to
        location: String,
        /// Description of the failure
        reason: String,
    },
}

/// Load/save interface over the backing document
///
/// Each request loads the full collection and, if it mutates it, saves the
/// full collection back. Implementations do no locking of their own: two
/// interleaved load/save cycles can lose an update.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read and parse the whole collection
    async fn load(&self) -> Result<Collection, PersistenceError>;

    /// Replace the whole persisted collection
    async fn save(&self, records: &Collection) -> Result<(), PersistenceError>;

    /// Human-readable location, used in logs and error messages
    fn location(&self) -> String;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn load(&self) -> Result<Collection, PersistenceError> {
        (**self).load().await
    }

    async fn save(&self, records: &Collection) -> Result<(), PersistenceError> {
        (**self).save(records).await
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Store backed by a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the document at `path`
    ///
    /// The file is not touched until the first load or save.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default document path, relative to the working directory
    pub fn default_path() -> PathBuf {
        PathBuf::from("data.json")
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<Collection, PersistenceError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|source| PersistenceError::Read {
                location: self.location(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Parse {
            location: self.location(),
            source,
        })
    }

    async fn save(&self, records: &Collection) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(records).map_err(|e| PersistenceError::Write {
            location: self.location(),
            reason: e.to_string(),
        })?;

        fs::write(&self.path, json)
            .await
            .map_err(|e| PersistenceError::Write {
                location: self.location(),
                reason: e.to_string(),
            })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process store, used by tests and for running without a file
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Collection>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create a store holding `records`
    pub fn new(records: Collection) -> Self {
        Self {
            records: Mutex::new(records),
            fail_writes: false,
        }
    }

    /// Make every save fail, leaving the held collection unchanged
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Snapshot of the currently held collection
    pub async fn snapshot(&self) -> Collection {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Result<Collection, PersistenceError> {
        Ok(self.records.lock().await.clone())
    }

    async fn save(&self, records: &Collection) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Write {
                location: self.location(),
                reason: "store is read-only".to_string(),
            });
        }
        *self.records.lock().await = records.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
