// State management module
// Handles record types, the shared application state, and persistence

pub mod app_state;
pub mod persistence;
pub mod record;

pub use app_state::AppState;
pub use persistence::{JsonFileStore, MemoryStore, PersistenceError, RecordStore};
pub use record::{Collection, Record};
