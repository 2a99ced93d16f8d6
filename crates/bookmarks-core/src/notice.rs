//! User-facing results of store operations

use serde::Serialize;

use crate::storage::StorageError;

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A short, dismissable message describing the outcome of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, title, message)
    }

    fn with_level(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Downgrade to a warning saying the change was kept only in memory
    pub fn unsaved(self, error: &StorageError) -> Self {
        let mut message = format!(
            "{} The change is visible for this session but was not saved: {}",
            self.message, error
        );
        if let Some(hint) = error.recovery_suggestion() {
            message.push(' ');
            message.push_str(hint);
        }
        Self::warning(self.title, message)
    }

    /// Whether the operation's effect reached durable storage (or needed none)
    pub fn is_saved(&self) -> bool {
        self.level != NoticeLevel::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_unsaved_downgrades_to_warning() {
        let err = StorageError::DiskFull {
            path: PathBuf::from("/data/bookmarks-links.json"),
            source: io::Error::new(io::ErrorKind::Other, "No space left on device"),
        };
        let notice = Notice::success("Link added", "Example was added to your bookmarks.")
            .unsaved(&err);

        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.title, "Link added");
        assert!(notice.message.starts_with("Example was added"));
        assert!(notice.message.contains("not saved"));
        assert!(notice.message.contains("Free up disk space"));
        assert!(!notice.is_saved());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_value(Notice::info("t", "m")).unwrap();
        assert_eq!(json["level"], "info");
    }
}
