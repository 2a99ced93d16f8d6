//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use bookmarks_core::{Link, Notice, NoticeLevel, Series};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single link
    pub fn print_link(&self, link: &Link) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", link.id);
                println!("Title:    {}", link.title);
                println!("URL:      {}", link.url);
                println!("Category: {}", link.category);
                println!("Visits:   {}", link.click_count);
                if let Some(ref favicon) = link.favicon {
                    println!("Favicon:  {}", favicon);
                }
                println!("Created:  {}", link.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(link),
            OutputFormat::Quiet => println!("{}", link.id),
        }
    }

    /// Print a list of links
    pub fn print_links(&self, links: &[&Link]) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No links found.");
                    return;
                }
                for link in links {
                    println!(
                        "{} | {} | {} | {}",
                        short_id(&link.id),
                        truncate(&link.title, 30),
                        truncate(&link.category, 14),
                        truncate(&link.url, 40)
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => print_json(links),
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print a single series
    pub fn print_series(&self, series: &Series) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:           {}", series.id);
                println!("Title:        {}", series.title);
                println!("URL:          {}", series.url);
                println!("Progress:     {}", progress(series));
                if let Some(total) = series.total_seasons {
                    println!("Seasons:      {}", total);
                }
                if let Some(total) = series.total_episodes {
                    println!("Episodes:     {}", total);
                }
                if let Some(ref poster) = series.poster {
                    println!("Poster:       {}", poster);
                }
                println!("Visits:       {}", series.click_count);
                println!(
                    "Last watched: {}",
                    series.last_watched.format("%Y-%m-%d %H:%M")
                );
            }
            OutputFormat::Json => print_json(series),
            OutputFormat::Quiet => println!("{}", series.id),
        }
    }

    /// Print a list of series
    pub fn print_series_list(&self, list: &[&Series]) {
        match self.format {
            OutputFormat::Human => {
                if list.is_empty() {
                    println!("No series found.");
                    return;
                }
                for series in list {
                    println!(
                        "{} | {} | {} | {}",
                        short_id(&series.id),
                        truncate(&series.title, 30),
                        progress(series),
                        series.last_watched.format("%Y-%m-%d")
                    );
                }
                println!("\n{} series", list.len());
            }
            OutputFormat::Json => print_json(list),
            OutputFormat::Quiet => {
                for series in list {
                    println!("{}", series.id);
                }
            }
        }
    }

    /// Print the most visited links and series
    pub fn print_top(&self, links: &[&Link], series: &[&Series]) {
        match self.format {
            OutputFormat::Human => {
                println!("Most visited links:");
                if links.is_empty() {
                    println!("  (none yet)");
                }
                for link in links {
                    println!("  {} ({})", link.title, link.click_count);
                }
                println!();
                println!("Most visited series:");
                if series.is_empty() {
                    println!("  (none yet)");
                }
                for s in series {
                    println!("  {} ({}) - {}", s.title, s.click_count, progress(s));
                }
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({ "links": links, "series": series }));
            }
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
                for s in series {
                    println!("{}", s.id);
                }
            }
        }
    }

    /// Print a list of category labels
    pub fn print_categories(&self, categories: &[String]) {
        match self.format {
            OutputFormat::Human | OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category);
                }
            }
            OutputFormat::Json => print_json(categories),
        }
    }

    /// Print the outcome of a store operation
    ///
    /// Warnings and errors go to stderr, even in quiet mode.
    pub fn notice(&self, notice: &Notice) {
        match self.format {
            OutputFormat::Human => {
                let line = format!("{} {}: {}", symbol(notice.level), notice.title, notice.message);
                match notice.level {
                    NoticeLevel::Success | NoticeLevel::Info => println!("{}", line),
                    NoticeLevel::Warning | NoticeLevel::Error => eprintln!("{}", line),
                }
            }
            OutputFormat::Json => print_json(notice),
            OutputFormat::Quiet => {
                if matches!(notice.level, NoticeLevel::Warning | NoticeLevel::Error) {
                    eprintln!("{}", notice.message);
                }
            }
        }
    }

    /// Print a warning that does not come from the store
    pub fn warn(&self, message: &str) {
        if !matches!(self.format, OutputFormat::Quiet) {
            eprintln!("⚠ {}", message);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to format output as JSON: {}", e),
    }
}

fn symbol(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Info => "·",
        NoticeLevel::Warning => "⚠",
        NoticeLevel::Error => "✗",
    }
}

fn progress(series: &Series) -> String {
    format!("S{:02}E{:02}", series.current_season, series.current_episode)
}

/// First 8 characters of an id
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookmarks_core::NewSeries;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_prompt_only_in_human_mode() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Counts characters, not bytes
        assert_eq!(truncate("séries télé", 8), "série...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("42"), "42");
    }

    #[test]
    fn test_progress_label() {
        let series = Series::create("s", NewSeries::new("Show", "https://tv.example").at(2, 13))
            .unwrap();
        assert_eq!(progress(&series), "S02E13");
    }
}
