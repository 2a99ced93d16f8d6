//! Command handlers

pub mod config;
pub mod data;
pub mod link;
pub mod series;
pub mod status;
pub mod top;

use std::io::{self, Write};

use anyhow::{bail, Result};

use bookmarks_core::Notice;

use crate::output::Output;

/// Resolve a user-supplied id against `(id, title)` candidates
///
/// An exact id wins; otherwise the id must be a unique prefix.
pub fn resolve_id<'a>(
    kind: &str,
    id: &str,
    candidates: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<String> {
    let mut matches = Vec::new();
    for (candidate, title) in candidates {
        if candidate == id {
            return Ok(candidate.to_string());
        }
        if candidate.starts_with(id) {
            matches.push((candidate, title));
        }
    }

    match matches.len() {
        0 => bail!("No {} found matching: {}", kind, id),
        1 => Ok(matches[0].0.to_string()),
        _ => {
            eprintln!("Multiple {}s match '{}':", kind, id);
            for (candidate, title) in &matches {
                eprintln!("  {} - {}", candidate, title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Open a url in the default browser
///
/// A failure is reported but does not fail the command; the visit has
/// already been recorded.
pub fn open_in_browser(url: &str, output: &Output) {
    if let Err(e) = open::that(url) {
        output.notice(&open_failed(url, &e));
    }
}

fn open_failed(url: &str, error: &io::Error) -> Notice {
    Notice::error("Could not open", format!("{}: {}", url, error))
}

/// Ask a yes/no question on stdin
///
/// Without a TTY on stdin the answer is no.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
