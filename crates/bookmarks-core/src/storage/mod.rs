//! Storage layer
//!
//! Durable state is a flat key-value store holding one JSON array per
//! collection.
//!
//! ## Architecture
//!
//! - **`KeyValueStore`**: `get`/`set` over string keys, implemented by a
//!   file-per-key backend, a SQLite table, and an in-memory map
//! - **`Persistence`**: typed adapter that namespaces keys and handles
//!   (de)serialization, falling back to defaults on unreadable values

pub mod error;
pub mod file;
pub mod memory;
pub mod persistence;
pub mod schema;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::{keys, Persistence};
pub use sqlite::SqliteStore;

/// A durable string key-value store
///
/// Implementations own their backing resource exclusively; concurrent
/// writers from other processes are not coordinated (last write wins).
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Short backend name for status output
    fn describe(&self) -> String;
}
