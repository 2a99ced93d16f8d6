//! Bookmarks Core Library
//!
//! This crate provides the core functionality for bookmarks, a local-first
//! tracker for saved links and series watch progress.
//!
//! # Architecture
//!
//! - **Key-value storage**: Source of truth, one JSON array per collection
//! - **In-memory state**: Both collections are loaded on open and written
//!   through after every mutation
//!
//! All queries are served from the in-memory collections.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Add a link
//! let notice = store.add_link(NewLink::new("Example", "https://example.com", "Technology"))?;
//!
//! // Query links
//! let links = filter_links(store.links(), "exam", &CategoryFilter::All);
//! ```
//!
//! # Modules
//!
//! - `store`: Application state and mutations (main entry point)
//! - `models`: Link and Series records with validation rules
//! - `snapshot`: Export/import document codec
//! - `view`: Filtering, search and ranking over the collections
//! - `storage`: Key-value backends and the typed persistence adapter
//! - `notice`: User-facing results of mutations
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod notice;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod view;

pub use config::{Config, StorageBackend};
pub use models::{favicon_url, hostname, Link, NewLink, NewSeries, Series, ValidationError};
pub use notice::{Notice, NoticeLevel};
pub use snapshot::{ImportOptions, ImportReport, ParseError, Snapshot};
pub use storage::{KeyValueStore, Persistence, StorageError};
pub use store::{AppState, Collection, Store, StoreError};
pub use view::{filter_links, filter_series, top_ranked, CategoryFilter, Ranked};
