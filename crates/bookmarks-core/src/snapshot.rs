//! Snapshot export and import
//!
//! A snapshot is a JSON document holding both collections:
//!
//! ```json
//! { "links": [...], "series": [...], "exportDate": "2024-05-01T10:00:00Z", "version": "1.0" }
//! ```
//!
//! Export is a straight serialization. Import is permissive: the document
//! must be JSON with `links` and `series` arrays, but individual entries are
//! coerced field by field and dropped when a required field is missing.
//! Only the resulting counts are reported.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Link, Series};

/// Schema tag written to every export
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Prefix for export file names
pub const EXPORT_FILE_PREFIX: &str = "bookmarks-backup";

/// Content type of an export
pub const CONTENT_TYPE: &str = "application/json";

/// Errors that reject a whole import
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("'{0}' is not a JSON file. Select a .json backup.")]
    NotJsonFile(String),

    #[error("Backup is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Backup must be a JSON object")]
    NotAnObject,

    #[error("Backup is missing the '{0}' array")]
    MissingCollection(&'static str),

    #[error("Strict import rejected {links} link(s) and {series} series with missing or duplicate fields")]
    RejectedEntries { links: usize, series: usize },
}

/// The full exported document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub links: Vec<Link>,
    pub series: Vec<Series>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl Snapshot {
    /// Snapshot of the given collections, stamped now
    pub fn new(links: Vec<Link>, series: Vec<Series>) -> Self {
        Self {
            links,
            series,
            export_date: Utc::now(),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// Download name, e.g. `bookmarks-backup-2024-05-01.json`
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.json",
            EXPORT_FILE_PREFIX,
            self.export_date.format("%Y-%m-%d")
        )
    }
}

/// Import behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Reject the whole document if any entry would be dropped
    pub strict: bool,
}

/// Counts of accepted and dropped entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub links_accepted: usize,
    pub links_dropped: usize,
    pub series_accepted: usize,
    pub series_dropped: usize,
}

/// Collections recovered from an import document
#[derive(Debug, Clone, PartialEq)]
pub struct Imported {
    pub links: Vec<Link>,
    pub series: Vec<Series>,
    pub report: ImportReport,
}

/// Reject files that are not named `*.json`
pub fn ensure_json_file(path: &Path) -> Result<(), ParseError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(())
    } else {
        Err(ParseError::NotJsonFile(path.display().to_string()))
    }
}

/// Parse an import document
pub fn parse(bytes: &[u8], options: ImportOptions) -> Result<Imported, ParseError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let root = document.as_object().ok_or(ParseError::NotAnObject)?;

    let raw_links = root
        .get("links")
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingCollection("links"))?;
    let raw_series = root
        .get("series")
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingCollection("series"))?;

    let now = Utc::now();

    let links = accept_unique(raw_links, |entry| coerce_link(entry, now), |l| &l.id);
    let series = accept_unique(raw_series, |entry| coerce_series(entry, now), |s| &s.id);

    let report = ImportReport {
        links_accepted: links.len(),
        links_dropped: raw_links.len() - links.len(),
        series_accepted: series.len(),
        series_dropped: raw_series.len() - series.len(),
    };

    if options.strict && (report.links_dropped > 0 || report.series_dropped > 0) {
        return Err(ParseError::RejectedEntries {
            links: report.links_dropped,
            series: report.series_dropped,
        });
    }

    info!(
        "Parsed snapshot: {} links ({} dropped), {} series ({} dropped)",
        report.links_accepted, report.links_dropped, report.series_accepted, report.series_dropped
    );

    Ok(Imported {
        links,
        series,
        report,
    })
}

/// Coerce every entry, keeping the first occurrence of each id
fn accept_unique<T>(
    entries: &[Value],
    coerce: impl Fn(&Map<String, Value>) -> Option<T>,
    id: impl Fn(&T) -> &String,
) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(item) = entry.as_object().and_then(&coerce) else {
            debug!("Dropping malformed entry");
            continue;
        };
        if seen.insert(id(&item).clone()) {
            accepted.push(item);
        } else {
            debug!("Dropping entry with duplicate id {}", id(&item));
        }
    }

    accepted
}

fn coerce_link(entry: &Map<String, Value>, now: DateTime<Utc>) -> Option<Link> {
    Some(Link {
        id: text(entry.get("id"))?,
        title: text(entry.get("title"))?,
        url: text(entry.get("url"))?,
        category: text(entry.get("category"))?,
        click_count: count(entry.get("clickCount")).unwrap_or(0),
        created_at: timestamp(entry.get("createdAt")).unwrap_or(now),
        favicon: text(entry.get("favicon")),
    })
}

fn coerce_series(entry: &Map<String, Value>, now: DateTime<Utc>) -> Option<Series> {
    Some(Series {
        id: text(entry.get("id"))?,
        title: text(entry.get("title"))?,
        url: text(entry.get("url"))?,
        current_season: positive(entry.get("currentSeason")).unwrap_or(1),
        current_episode: positive(entry.get("currentEpisode")).unwrap_or(1),
        total_seasons: positive(entry.get("totalSeasons")),
        total_episodes: positive(entry.get("totalEpisodes")),
        last_watched: timestamp(entry.get("lastWatched")).unwrap_or(now),
        click_count: count(entry.get("clickCount")).unwrap_or(0),
        poster: text(entry.get("poster")),
    })
}

/// Non-blank string; numbers are accepted in their decimal form
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative integer from a number or numeric string, truncating fractions
fn count(value: Option<&Value>) -> Option<u64> {
    let n = match value? {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                return Some(n);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if n.is_finite() && n >= 0.0 && n <= u64::MAX as f64 {
        Some(n.trunc() as u64)
    } else {
        None
    }
}

/// Integer of at least 1 that fits a u32
fn positive(value: Option<&Value>) -> Option<u32> {
    count(value)
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

/// RFC 3339 text, a plain `YYYY-MM-DD` date, or epoch milliseconds
fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
            Some(date.and_hms_opt(0, 0, 0)?.and_utc())
        }
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        _ => None,
    }
}
