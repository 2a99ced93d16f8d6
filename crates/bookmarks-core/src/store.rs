//! Application state and mutations
//!
//! The `Store` owns both collections in memory and writes them through to
//! durable storage after every change.
//!
//! ## Write-through
//!
//! Each mutation changes the in-memory collection first, then writes the
//! whole collection under its key. A failed write does not undo the
//! change: the returned notice becomes a warning so the user knows the
//! change only lives for this session.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Loads both collections
//!
//! // Add data
//! let notice = store.add_link(NewLink::new("Rust", "https://rust-lang.org", "Technology"))?;
//!
//! // Query data
//! let top = top_ranked(store.links(), 2);
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{fresh_id, Link, NewLink, NewSeries, Series, ValidationError};
use crate::notice::Notice;
use crate::snapshot::{self, ImportOptions, ImportReport, ParseError, Snapshot};
use crate::storage::file::atomic_write;
use crate::storage::{keys, KeyValueStore, Persistence, StorageError, StorageResult};

/// Errors that reject an operation and leave state untouched
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One of the two top-level collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Links,
    Series,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Links => write!(f, "links"),
            Collection::Series => write!(f, "series"),
        }
    }
}

impl Collection {
    fn key(self) -> &'static str {
        match self {
            Collection::Links => keys::LINKS,
            Collection::Series => keys::SERIES,
        }
    }
}

/// Both collections as held in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub links: Vec<Link>,
    pub series: Vec<Series>,
}

/// Application state with write-through persistence
pub struct Store {
    state: AppState,
    persistence: Persistence,
    config: Config,
    /// Text last read from or written to storage, per collection
    synced_links: Option<String>,
    synced_series: Option<String>,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let backend = config
            .open_backend()
            .with_context(|| format!("Failed to open {} storage", config.storage))?;
        Ok(Self::with_backend(config, backend))
    }

    /// Open the store over an explicit key-value backend
    pub fn with_backend(config: Config, backend: Box<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            state: AppState::default(),
            persistence: Persistence::new(backend),
            config,
            synced_links: None,
            synced_series: None,
        };
        store.reload();
        store
    }

    /// Re-read both collections from storage, discarding in-memory state
    pub fn reload(&mut self) {
        let links = self.persistence.read_tracked(keys::LINKS, Vec::new());
        let series = self.persistence.read_tracked(keys::SERIES, Vec::new());

        self.state = AppState {
            links: links.value,
            series: series.value,
        };
        self.synced_links = links.raw;
        self.synced_series = series.raw;

        info!(
            "Loaded {} links and {} series from {}",
            self.state.links.len(),
            self.state.series.len(),
            self.persistence.describe()
        );
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configured category labels
    pub fn categories(&self) -> &[String] {
        &self.config.categories
    }

    /// Short description of the storage backend
    pub fn storage_description(&self) -> String {
        self.persistence.describe()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn links(&self) -> &[Link] {
        &self.state.links
    }

    pub fn series(&self) -> &[Series] {
        &self.state.series
    }

    pub fn find_link(&self, id: &str) -> Option<&Link> {
        self.state.links.iter().find(|l| l.id == id)
    }

    pub fn find_series(&self, id: &str) -> Option<&Series> {
        self.state.series.iter().find(|s| s.id == id)
    }

    // ==================== Link Operations ====================

    /// Add a new link at the front of the collection
    pub fn add_link(&mut self, input: NewLink) -> Result<Notice, StoreError> {
        let id = fresh_id(|id| self.find_link(id).is_some());
        let link = Link::create(id, input, self.config.favicon_size)?;

        let notice = Notice::success(
            "Link added",
            format!("{} was added to your bookmarks.", link.title),
        );
        self.state.links.insert(0, link);
        Ok(self.persist(Collection::Links, notice))
    }

    /// Remove a link; unknown ids leave the collection unchanged
    pub fn delete_link(&mut self, id: &str) -> Notice {
        let before = self.state.links.len();
        self.state.links.retain(|l| l.id != id);

        if self.state.links.len() == before {
            return Notice::info("Nothing removed", format!("No link with id {}.", id));
        }
        let notice = Notice::success("Link removed", "The link was removed from your bookmarks.");
        self.persist(Collection::Links, notice)
    }

    /// Record a visit to a link
    pub fn visit_link(&mut self, id: &str) -> Notice {
        let Some(link) = self.state.links.iter_mut().find(|l| l.id == id) else {
            return Notice::info("Nothing visited", format!("No link with id {}.", id));
        };
        link.record_visit();

        let notice = Notice::success(
            "Link visited",
            format!("{} has {} visit(s).", link.title, link.click_count),
        );
        self.persist(Collection::Links, notice)
    }

    // ==================== Series Operations ====================

    /// Add a new series at the front of the collection
    pub fn add_series(&mut self, input: NewSeries) -> Result<Notice, StoreError> {
        let id = fresh_id(|id| self.find_series(id).is_some());
        let series = Series::create(id, input)?;

        let notice = Notice::success(
            "Series added",
            format!("{} was added to your list.", series.title),
        );
        self.state.series.insert(0, series);
        Ok(self.persist(Collection::Series, notice))
    }

    /// Remove a series; unknown ids leave the collection unchanged
    pub fn delete_series(&mut self, id: &str) -> Notice {
        let before = self.state.series.len();
        self.state.series.retain(|s| s.id != id);

        if self.state.series.len() == before {
            return Notice::info("Nothing removed", format!("No series with id {}.", id));
        }
        let notice = Notice::success("Series removed", "The series was removed from your list.");
        self.persist(Collection::Series, notice)
    }

    /// Record a visit to a series
    pub fn visit_series(&mut self, id: &str) -> Notice {
        let Some(series) = self.state.series.iter_mut().find(|s| s.id == id) else {
            return Notice::info("Nothing visited", format!("No series with id {}.", id));
        };
        series.record_visit();

        let notice = Notice::success(
            "Series visited",
            format!(
                "{}: season {} episode {}.",
                series.title, series.current_season, series.current_episode
            ),
        );
        self.persist(Collection::Series, notice)
    }

    /// Set a series' progress directly
    pub fn update_series_episode(
        &mut self,
        id: &str,
        season: u32,
        episode: u32,
    ) -> Result<Notice, StoreError> {
        let Some(series) = self.state.series.iter_mut().find(|s| s.id == id) else {
            return Ok(Notice::info(
                "Nothing updated",
                format!("No series with id {}.", id),
            ));
        };
        series.set_progress(season, episode)?;

        Ok(self.persist(Collection::Series, progress_notice(season, episode)))
    }

    pub fn next_episode(&mut self, id: &str) -> Notice {
        self.step_series(id, Series::increment_episode)
    }

    pub fn previous_episode(&mut self, id: &str) -> Notice {
        self.step_series(id, Series::decrement_episode)
    }

    pub fn next_season(&mut self, id: &str) -> Notice {
        self.step_series(id, Series::increment_season)
    }

    pub fn previous_season(&mut self, id: &str) -> Notice {
        self.step_series(id, Series::decrement_season)
    }

    /// Apply a progress step; `step` returns false when it changed nothing
    fn step_series(&mut self, id: &str, step: impl FnOnce(&mut Series) -> bool) -> Notice {
        let Some(series) = self.state.series.iter_mut().find(|s| s.id == id) else {
            return Notice::info("Nothing updated", format!("No series with id {}.", id));
        };

        if !step(series) {
            return Notice::info(
                "No change",
                format!(
                    "{} is at season {} episode {}.",
                    series.title, series.current_season, series.current_episode
                ),
            );
        }
        series.touch();

        let notice = progress_notice(series.current_season, series.current_episode);
        self.persist(Collection::Series, notice)
    }

    // ==================== Snapshots ====================

    /// Snapshot of the current state
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot::new(self.state.links.clone(), self.state.series.clone())
    }

    /// Write a snapshot file
    ///
    /// `target` may be a directory, in which case the dated default file
    /// name is used inside it. Returns the path written.
    pub fn export_to(&self, target: &Path) -> Result<(PathBuf, Notice), StoreError> {
        let snapshot = self.export_snapshot();
        let path = if target.is_dir() {
            target.join(snapshot.file_name())
        } else {
            target.to_path_buf()
        };

        let bytes = snapshot.to_bytes().map_err(|source| StorageError::Serialize {
            key: path.display().to_string(),
            source,
        })?;
        atomic_write(&path, &bytes)?;

        info!(
            "Exported {} links and {} series to {:?}",
            snapshot.links.len(),
            snapshot.series.len(),
            path
        );
        let notice = Notice::success(
            "Data exported",
            format!("Backup written to {}.", path.display()),
        );
        Ok((path, notice))
    }

    /// Replace both collections with the contents of an import document
    ///
    /// A document that cannot be parsed leaves the current state untouched.
    pub fn import_snapshot(
        &mut self,
        bytes: &[u8],
        options: ImportOptions,
    ) -> Result<(ImportReport, Notice), StoreError> {
        let imported = snapshot::parse(bytes, options)?;
        let report = imported.report;

        self.state = AppState {
            links: imported.links,
            series: imported.series,
        };

        let notice = Notice::success(
            "Data imported",
            format!(
                "{} links and {} series were imported.",
                report.links_accepted, report.series_accepted
            ),
        );
        let notice = self.persist_all(notice);
        Ok((report, notice))
    }

    /// Import a `.json` file from disk
    pub fn import_file(
        &mut self,
        path: &Path,
        options: ImportOptions,
    ) -> Result<(ImportReport, Notice), StoreError> {
        snapshot::ensure_json_file(path)?;
        let bytes = std::fs::read(path).map_err(|source| StoreError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_snapshot(&bytes, options)
    }

    // ==================== External changes ====================

    /// Collections whose stored value differs from what this store last
    /// read or wrote, i.e. that another instance has overwritten
    pub fn external_changes(&self) -> StorageResult<Vec<Collection>> {
        let mut changed = Vec::new();
        for (collection, synced) in [
            (Collection::Links, &self.synced_links),
            (Collection::Series, &self.synced_series),
        ] {
            let stored = self.persistence.read_raw(collection.key())?;
            if stored != *synced {
                changed.push(collection);
            }
        }
        Ok(changed)
    }

    // ==================== Persistence ====================

    fn persist(&mut self, collection: Collection, notice: Notice) -> Notice {
        match self.write(collection) {
            Ok(()) => notice,
            Err(e) => {
                warn!("Failed to save {}: {}", collection, e);
                notice.unsaved(&e)
            }
        }
    }

    fn persist_all(&mut self, notice: Notice) -> Notice {
        let links = self.write(Collection::Links);
        let series = self.write(Collection::Series);

        let (failed, error, saved) = match (links, series) {
            (Ok(()), Ok(())) => return notice,
            (Err(e), Ok(())) => ("links", e, Some(Collection::Series)),
            (Ok(()), Err(e)) => ("series", e, Some(Collection::Links)),
            (Err(e), Err(_)) => ("links and series", e, None),
        };
        warn!("Failed to save imported {}: {}", failed, error);

        let mut notice = notice.unsaved(&error);
        notice.message.push_str(&format!(" Imported {} were not saved.", failed));
        if let Some(saved) = saved {
            notice.message.push_str(&format!(
                " Imported {} were saved, so stored data is only partly replaced.",
                saved
            ));
        }
        notice
    }

    fn write(&mut self, collection: Collection) -> StorageResult<()> {
        match collection {
            Collection::Links => {
                let text = self.persistence.write(keys::LINKS, &self.state.links)?;
                self.synced_links = Some(text);
            }
            Collection::Series => {
                let text = self.persistence.write(keys::SERIES, &self.state.series)?;
                self.synced_series = Some(text);
            }
        }
        Ok(())
    }
}

fn progress_notice(season: u32, episode: u32) -> Notice {
    Notice::success(
        "Progress updated",
        format!("Episode {} of season {} marked.", episode, season),
    )
}
