//! Save/load persistence
//!
//! Features:
//! - Flat key-value store of JSON values (in memory or a JSON file)
//! - Atomic file writes (tmp → save)
//! - Corruption detection: a damaged save is discarded as a whole

pub mod save;
pub mod store;

pub use save::{LoadError, load_inventory, save_inventory, try_load_inventory};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
