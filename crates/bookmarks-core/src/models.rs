//! Data models for bookmarks
//!
//! Defines the two record kinds, Link and Series, along with the rules for
//! constructing them from user input and for changing watch progress.
//! Both serialize with camelCase field names, which is the shape used in
//! durable storage and in exported snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Favicon lookup service, parameterized by `domain` and `sz`
const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Default favicon edge length in pixels
pub const DEFAULT_FAVICON_SIZE: u32 = 64;

/// Errors raised when user input cannot become a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{field} must be at least 1 (got {value})")]
    BelowMinimum { field: &'static str, value: u32 },
}

/// A saved link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Unique identifier, never reassigned
    pub id: String,
    /// Display title
    pub title: String,
    /// Absolute URL
    pub url: String,
    /// Category label
    pub category: String,
    /// Number of recorded visits
    pub click_count: u64,
    /// When this link was created
    pub created_at: DateTime<Utc>,
    /// Favicon lookup URL derived from the hostname at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

/// User input for a new link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub category: String,
}

impl NewLink {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            category: category.into(),
        }
    }
}

impl Link {
    /// Build a link from user input
    ///
    /// Title, url and category are required and the url must parse as an
    /// absolute URL. The favicon is best-effort: a url without a hostname
    /// still produces a link, just without a favicon.
    pub fn create(
        id: impl Into<String>,
        input: NewLink,
        favicon_size: u32,
    ) -> Result<Self, ValidationError> {
        let title = required("title", &input.title)?;
        let url = required("url", &input.url)?;
        let category = required("category", &input.category)?;

        Url::parse(&url).map_err(|e| ValidationError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            id: id.into(),
            favicon: favicon_url(&url, favicon_size),
            title,
            url,
            category,
            click_count: 0,
            created_at: Utc::now(),
        })
    }

    /// Hostname of the link's url, if it has one
    pub fn hostname(&self) -> Option<String> {
        hostname(&self.url)
    }

    /// Record a visit
    pub fn record_visit(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
    }
}

/// A series with watch progress
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Unique identifier, never reassigned
    pub id: String,
    /// Display title
    pub title: String,
    /// Where the "watch" action goes
    pub url: String,
    /// Current season, never below 1
    pub current_season: u32,
    /// Current episode, never below 1
    pub current_episode: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    /// Last visit or progress update
    pub last_watched: DateTime<Utc>,
    /// Number of recorded visits
    pub click_count: u64,
    /// Poster image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// User input for a new series
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSeries {
    pub title: String,
    pub url: String,
    pub current_season: Option<u32>,
    pub current_episode: Option<u32>,
    pub total_seasons: Option<u32>,
    pub total_episodes: Option<u32>,
    pub poster: Option<String>,
}

impl NewSeries {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the starting progress
    pub fn at(mut self, season: u32, episode: u32) -> Self {
        self.current_season = Some(season);
        self.current_episode = Some(episode);
        self
    }
}

impl Series {
    /// Build a series from user input
    ///
    /// Season and episode default to 1 and are floored at 1. Totals and
    /// poster are informational and taken as given.
    pub fn create(id: impl Into<String>, input: NewSeries) -> Result<Self, ValidationError> {
        let title = required("title", &input.title)?;
        let url = required("url", &input.url)?;

        Ok(Self {
            id: id.into(),
            title,
            url,
            current_season: input.current_season.unwrap_or(1).max(1),
            current_episode: input.current_episode.unwrap_or(1).max(1),
            total_seasons: input.total_seasons,
            total_episodes: input.total_episodes,
            last_watched: Utc::now(),
            click_count: 0,
            poster: input.poster.filter(|p| !p.trim().is_empty()),
        })
    }

    /// Advance one episode; returns false at `u32::MAX`
    pub fn increment_episode(&mut self) -> bool {
        match self.current_episode.checked_add(1) {
            Some(next) => {
                self.current_episode = next;
                true
            }
            None => false,
        }
    }

    /// Step back one episode; returns false at episode 1
    pub fn decrement_episode(&mut self) -> bool {
        if self.current_episode > 1 {
            self.current_episode -= 1;
            true
        } else {
            false
        }
    }

    /// Advance to the first episode of the next season; returns false at
    /// `u32::MAX`
    pub fn increment_season(&mut self) -> bool {
        match self.current_season.checked_add(1) {
            Some(next) => {
                self.current_season = next;
                self.current_episode = 1;
                true
            }
            None => false,
        }
    }

    /// Step back to the first episode of the previous season; returns false
    /// at season 1
    pub fn decrement_season(&mut self) -> bool {
        if self.current_season > 1 {
            self.current_season -= 1;
            self.current_episode = 1;
            true
        } else {
            false
        }
    }

    /// Jump directly to a season and episode and refresh `last_watched`
    pub fn set_progress(&mut self, season: u32, episode: u32) -> Result<(), ValidationError> {
        if season < 1 {
            return Err(ValidationError::BelowMinimum {
                field: "season",
                value: season,
            });
        }
        if episode < 1 {
            return Err(ValidationError::BelowMinimum {
                field: "episode",
                value: episode,
            });
        }
        self.current_season = season;
        self.current_episode = episode;
        self.touch();
        Ok(())
    }

    /// Record a visit
    pub fn record_visit(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
        self.touch();
    }

    /// Refresh `last_watched`
    pub fn touch(&mut self) {
        self.last_watched = Utc::now();
    }
}

/// Generate an id that `taken` does not reject
pub fn fresh_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !taken(&id) {
            return id;
        }
    }
}

/// Hostname of an absolute URL
pub fn hostname(url: &str) -> Option<String> {
    Url::parse(url.trim())
        .ok()?
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

/// Favicon lookup URL for the hostname of `url`
pub fn favicon_url(url: &str, size: u32) -> Option<String> {
    hostname(url).map(|host| format!("{}?domain={}&sz={}", FAVICON_SERVICE, host, size))
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_at(season: u32, episode: u32) -> Series {
        Series::create("s1", NewSeries::new("Show", "https://tv.example").at(season, episode))
            .unwrap()
    }

    #[test]
    fn test_link_create() {
        let link = Link::create(
            "1",
            NewLink::new("Example", "https://example.com", "Tech"),
            DEFAULT_FAVICON_SIZE,
        )
        .unwrap();
        assert_eq!(link.click_count, 0);
        assert_eq!(link.hostname().as_deref(), Some("example.com"));
        assert_eq!(
            link.favicon.as_deref(),
            Some("https://www.google.com/s2/favicons?domain=example.com&sz=64")
        );
    }

    #[test]
    fn test_link_create_trims_input() {
        let link = Link::create("1", NewLink::new("  Rust ", " https://rust-lang.org ", "Dev"), 32)
            .unwrap();
        assert_eq!(link.title, "Rust");
        assert_eq!(link.url, "https://rust-lang.org");
        assert!(link.favicon.unwrap().ends_with("sz=32"));
    }

    #[test]
    fn test_link_create_missing_fields() {
        let err = Link::create("1", NewLink::new("", "https://a.com", "Tech"), 64).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("title"));

        let err = Link::create("1", NewLink::new("A", "   ", "Tech"), 64).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("url"));

        let err = Link::create("1", NewLink::new("A", "https://a.com", ""), 64).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("category"));
    }

    #[test]
    fn test_link_create_rejects_relative_url() {
        let err = Link::create("1", NewLink::new("A", "example.com/path", "Tech"), 64).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidUrl { .. }));
    }

    #[test]
    fn test_link_without_hostname_has_no_favicon() {
        // Parses as absolute, but there is no host to look up
        let link = Link::create("1", NewLink::new("Mail", "mailto:me@example.com", "Other"), 64)
            .unwrap();
        assert!(link.favicon.is_none());
        assert!(link.hostname().is_none());
    }

    #[test]
    fn test_link_accepts_unlisted_category() {
        let link = Link::create("1", NewLink::new("A", "https://a.com", "Whatever"), 64).unwrap();
        assert_eq!(link.category, "Whatever");
    }

    #[test]
    fn test_link_record_visit() {
        let mut link = Link::create("1", NewLink::new("A", "https://a.com", "Tech"), 64).unwrap();
        link.record_visit();
        link.record_visit();
        link.record_visit();
        assert_eq!(link.click_count, 3);
    }

    #[test]
    fn test_series_create_defaults() {
        let series = Series::create("s", NewSeries::new("Show", "https://tv.example")).unwrap();
        assert_eq!(series.current_season, 1);
        assert_eq!(series.current_episode, 1);
        assert_eq!(series.click_count, 0);
        assert!(series.total_seasons.is_none());
    }

    #[test]
    fn test_series_create_floors_progress() {
        let series = series_at(0, 0);
        assert_eq!(series.current_season, 1);
        assert_eq!(series.current_episode, 1);
    }

    #[test]
    fn test_series_create_requires_title_and_url() {
        let err = Series::create("s", NewSeries::new(" ", "https://tv.example")).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("title"));
        let err = Series::create("s", NewSeries::new("Show", "")).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("url"));
    }

    #[test]
    fn test_episode_steps() {
        let mut series = series_at(1, 1);
        assert!(series.increment_episode());
        assert_eq!(series.current_episode, 2);
        assert!(series.decrement_episode());
        assert_eq!(series.current_episode, 1);

        // Floor
        assert!(!series.decrement_episode());
        assert_eq!(series.current_episode, 1);
    }

    #[test]
    fn test_increment_season_resets_episode() {
        let mut series = series_at(2, 7);
        assert!(series.increment_season());
        assert_eq!(series.current_season, 3);
        assert_eq!(series.current_episode, 1);
    }

    #[test]
    fn test_increments_stop_at_ceiling() {
        let mut series = series_at(u32::MAX, u32::MAX);
        assert!(!series.increment_episode());
        assert_eq!(series.current_episode, u32::MAX);

        assert!(!series.increment_season());
        assert_eq!(series.current_season, u32::MAX);
        // A refused season step leaves the episode alone
        assert_eq!(series.current_episode, u32::MAX);
    }

    #[test]
    fn test_decrement_season() {
        let mut series = series_at(3, 4);
        assert!(series.decrement_season());
        assert_eq!(series.current_season, 2);
        assert_eq!(series.current_episode, 1);

        let mut first = series_at(1, 5);
        assert!(!first.decrement_season());
        assert_eq!(first.current_season, 1);
        assert_eq!(first.current_episode, 5);
    }

    #[test]
    fn test_decrements_never_go_below_one() {
        for start in 1..6 {
            let mut series = series_at(start, start);
            for _ in 0..10 {
                series.decrement_episode();
                series.decrement_season();
            }
            assert_eq!(series.current_season, 1);
            assert_eq!(series.current_episode, 1);
        }
    }

    #[test]
    fn test_set_progress() {
        let mut series = series_at(1, 5);
        let before = series.last_watched;
        std::thread::sleep(std::time::Duration::from_millis(5));
        series.set_progress(2, 1).unwrap();
        assert_eq!(series.current_season, 2);
        assert_eq!(series.current_episode, 1);
        assert!(series.last_watched > before);
    }

    #[test]
    fn test_set_progress_rejects_zero() {
        let mut series = series_at(1, 5);
        let err = series.set_progress(0, 3).unwrap_err();
        assert!(matches!(err, ValidationError::BelowMinimum { field: "season", .. }));
        assert_eq!(series.current_episode, 5);
    }

    #[test]
    fn test_series_record_visit() {
        let mut series = series_at(1, 1);
        let before = series.last_watched;
        std::thread::sleep(std::time::Duration::from_millis(5));
        series.record_visit();
        assert_eq!(series.click_count, 1);
        assert!(series.last_watched > before);
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let first = fresh_id(|_| false);
        let second = fresh_id(|id| id == first);
        assert_ne!(first, second);
        assert!(!second.is_empty());
    }

    #[test]
    fn test_link_serialization_uses_camel_case() {
        let link = Link::create("1", NewLink::new("A", "https://a.com", "Tech"), 64).unwrap();
        let json = serde_json::to_value(&link).unwrap();
        assert!(json.get("clickCount").is_some());
        assert!(json.get("createdAt").is_some());

        let back: Link = serde_json::from_value(json).unwrap();
        assert_eq!(back, link);
    }

    #[test]
    fn test_series_serialization_skips_absent_optionals() {
        let series = series_at(1, 1);
        let json = serde_json::to_value(&series).unwrap();
        assert!(json.get("poster").is_none());
        assert!(json.get("totalSeasons").is_none());
        assert_eq!(json["currentSeason"], 1);
    }
}
