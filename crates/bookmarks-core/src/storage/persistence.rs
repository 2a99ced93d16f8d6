//! Typed persistence over a key-value store
//!
//! Values are stored as JSON text under namespaced keys
//! (`bookmarks-links`, `bookmarks-series`). Reads never fail: an absent
//! or undecodable value yields the caller's default. Writes report
//! failures so the caller can tell the user a change was not saved.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{KeyValueStore, StorageError, StorageResult};

/// Keys used in durable storage
pub mod keys {
    pub const NAMESPACE: &str = "bookmarks";
    pub const LINKS: &str = "links";
    pub const SERIES: &str = "series";
}

/// A value read from storage along with the raw text it came from
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    /// Stored text, `None` when the key was absent or unreadable
    pub raw: Option<String>,
}

/// Typed read/write adapter over a `KeyValueStore`
pub struct Persistence {
    backend: Box<dyn KeyValueStore>,
    namespace: String,
}

impl Persistence {
    /// Create an adapter using the default namespace
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self::with_namespace(backend, keys::NAMESPACE)
    }

    pub fn with_namespace(backend: Box<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// Full storage key for a collection name
    pub fn key(&self, name: &str) -> String {
        format!("{}-{}", self.namespace, name)
    }

    /// Short description of the backing store
    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    /// Read a value, falling back to `default`
    pub fn read<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        self.read_tracked(name, default).value
    }

    /// Read a value and keep the stored text for later change detection
    pub fn read_tracked<T: DeserializeOwned>(&self, name: &str, default: T) -> Loaded<T> {
        let key = self.key(name);

        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored value for {}, using default", key);
                return Loaded {
                    value: default,
                    raw: None,
                };
            }
            Err(e) => {
                warn!("Failed to read {}: {}; using default", key, e);
                return Loaded {
                    value: default,
                    raw: None,
                };
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("Loaded {} ({} bytes)", key, raw.len());
                Loaded {
                    value,
                    raw: Some(raw),
                }
            }
            Err(e) => {
                warn!("Stored value for {} is not readable: {}; using default", key, e);
                Loaded {
                    value: default,
                    raw: Some(raw),
                }
            }
        }
    }

    /// Read the stored text for a collection without decoding it
    pub fn read_raw(&self, name: &str) -> StorageResult<Option<String>> {
        self.backend.get(&self.key(name))
    }

    /// Serialize and store a value, returning the text that was written
    pub fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> StorageResult<String> {
        let key = self.key(name);
        let text = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.clone(),
            source,
        })?;

        self.backend.set(&key, &text)?;
        debug!("Wrote {} ({} bytes)", key, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    #[test]
    fn test_key_is_namespaced() {
        let persistence = Persistence::new(Box::new(MemoryStore::new()));
        assert_eq!(persistence.key(keys::LINKS), "bookmarks-links");
        assert_eq!(persistence.key(keys::SERIES), "bookmarks-series");
    }

    #[test]
    fn test_read_absent_returns_default() {
        let persistence = Persistence::new(Box::new(MemoryStore::new()));
        let value: Vec<u32> = persistence.read(keys::LINKS, vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_write_then_read() {
        let memory = MemoryStore::new();
        let persistence = Persistence::new(Box::new(memory.clone()));

        let text = persistence.write(keys::LINKS, &vec![1u32, 2, 3]).unwrap();
        assert_eq!(text, "[1,2,3]");
        assert_eq!(memory.get("bookmarks-links").unwrap().as_deref(), Some("[1,2,3]"));

        let value: Vec<u32> = persistence.read(keys::LINKS, Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_corrupt_value_returns_default() {
        let memory = MemoryStore::new();
        memory.set("bookmarks-series", "{not json").unwrap();
        let persistence = Persistence::new(Box::new(memory));

        let loaded = persistence.read_tracked::<Vec<u32>>(keys::SERIES, Vec::new());
        assert!(loaded.value.is_empty());
        assert_eq!(loaded.raw.as_deref(), Some("{not json"));
    }

    #[test]
    fn test_wrong_shape_returns_default() {
        let memory = MemoryStore::new();
        memory.set("bookmarks-links", r#"{"a": 1}"#).unwrap();
        let persistence = Persistence::new(Box::new(memory));

        let value: Vec<u32> = persistence.read(keys::LINKS, Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_custom_namespace() {
        let memory = MemoryStore::new();
        let persistence = Persistence::with_namespace(Box::new(memory.clone()), "test");
        persistence.write(keys::LINKS, &Vec::<u32>::new()).unwrap();
        assert!(memory.get("test-links").unwrap().is_some());
    }

    #[test]
    fn test_file_backend_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = Persistence::new(Box::new(FileStore::new(temp_dir.path())));

        persistence
            .write(keys::SERIES, &vec!["a".to_string()])
            .unwrap();
        assert!(temp_dir.path().join("bookmarks-series.json").exists());

        let value: Vec<String> = persistence.read(keys::SERIES, Vec::new());
        assert_eq!(value, vec!["a"]);
    }
}
