//! Export and import command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use bookmarks_core::{ImportOptions, Store};

use crate::output::Output;

/// Write a backup to `target`, or to the current directory
pub fn export(store: &Store, target: Option<PathBuf>, output: &Output) -> Result<()> {
    let target = target.unwrap_or_else(|| PathBuf::from("."));
    let (path, notice) = store
        .export_to(&target)
        .with_context(|| format!("Failed to export to {}", target.display()))?;

    output.notice(&notice);
    if output.is_json() {
        println!("{}", serde_json::json!({ "path": path }));
    }

    Ok(())
}

/// Replace all data with a backup file
pub fn import(store: &mut Store, file: PathBuf, strict: bool, output: &Output) -> Result<()> {
    let (report, notice) = store
        .import_file(&file, ImportOptions { strict })
        .with_context(|| format!("Failed to import {}", file.display()))?;

    output.notice(&notice);

    if output.is_json() {
        println!("{}", serde_json::json!({ "report": report }));
    } else if report.links_dropped > 0 || report.series_dropped > 0 {
        output.warn(&format!(
            "Skipped {} invalid link(s) and {} invalid series",
            report.links_dropped, report.series_dropped
        ));
    }

    Ok(())
}
