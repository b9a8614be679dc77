// Application state shared by all handlers
// Holds the record store and the optional single-writer lock

use super::persistence::{JsonFileStore, RecordStore};
use crate::config::Config;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Main application state
///
/// Cloned into every handler. The collection itself is never cached here:
/// every request goes back to the store.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RecordStore>,
    /// Present when mutating requests must run one at a time
    write_lock: Option<Arc<Mutex<()>>>,
}

impl AppState {
    /// Create state over the given store, with unserialized writes
    pub fn new<S: RecordStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
            write_lock: None,
        }
    }

    /// Build state from application configuration
    pub fn from_config(config: &Config) -> Self {
        let state = Self::new(JsonFileStore::new(&config.storage.data_file));
        if config.storage.serialize_writes {
            state.with_serialized_writes()
        } else {
            state
        }
    }

    /// Serialize every load-mutate-save cycle behind one process-wide lock
    pub fn with_serialized_writes(mut self) -> Self {
        self.write_lock = Some(Arc::new(Mutex::new(())));
        self
    }

    /// Whether mutating requests are serialized
    pub fn serializes_writes(&self) -> bool {
        self.write_lock.is_some()
    }

    /// The backing record store
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Acquire the writer lock, if writes are serialized
    ///
    /// Hold the returned guard across the whole load-mutate-save cycle.
    /// Without serialization this returns `None` immediately and concurrent
    /// writers may overwrite each other.
    pub async fn write_guard(&self) -> Option<OwnedMutexGuard<()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.clone().lock_owned().await),
            None => None,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.location())
            .field("serialize_writes", &self.serializes_writes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, StorageConfig};
    use crate::state::MemoryStore;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_from_config_respects_serialize_writes() {
        let mut config = Config {
            server: ServerConfig {
                port: 8080,
                host: "127.0.0.1".to_string(),
            },
            storage: StorageConfig {
                data_file: PathBuf::from("records.json"),
                serialize_writes: false,
            },
        };
        let state = AppState::from_config(&config);
        assert!(!state.serializes_writes());
        assert_eq!(state.store().location(), "records.json");

        config.storage.serialize_writes = true;
        assert!(AppState::from_config(&config).serializes_writes());
    }

    #[tokio::test]
    async fn test_write_guard_absent_by_default() {
        let state = AppState::new(MemoryStore::default());
        assert!(state.write_guard().await.is_none());
    }

    #[tokio::test]
    async fn test_write_guard_excludes_second_writer() {
        let state = AppState::new(MemoryStore::default()).with_serialized_writes();
        let first = state.write_guard().await;
        assert!(first.is_some());

        let contender = state.clone();
        let second = tokio::time::timeout(Duration::from_millis(50), contender.write_guard()).await;
        assert!(second.is_err(), "second writer should wait for the first");

        drop(first);
        let third = tokio::time::timeout(Duration::from_millis(500), state.write_guard()).await;
        assert!(matches!(third, Ok(Some(_))));
    }
}
