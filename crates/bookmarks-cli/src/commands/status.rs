//! Status command handler

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use bookmarks_core::storage::{keys, FileStore};
use bookmarks_core::{Config, StorageBackend, Store};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config = store.config();
    let size = storage_size(config);
    let link_visits: u64 = store.links().iter().map(|l| l.click_count).sum();
    let series_visits: u64 = store.series().iter().map(|s| s.click_count).sum();
    let config_file = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": config_file,
                    "storage": {
                        "backend": config.storage.to_string(),
                        "location": store.storage_description(),
                        "size": size
                    },
                    "counts": {
                        "links": store.links().len(),
                        "series": store.series().len(),
                        "link_visits": link_visits,
                        "series_visits": series_visits
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{} {}", store.links().len(), store.series().len());
        }
        OutputFormat::Human => {
            println!("Bookmarks Status");
            println!("================");
            println!();
            println!("Storage:");
            println!("  Backend:  {}", config.storage);
            println!("  Location: {}", store.storage_description());
            println!("  Size:     {}", format_size(size));
            println!();
            println!("Contents:");
            println!("  Links:  {} ({} visits)", store.links().len(), link_visits);
            println!("  Series: {} ({} visits)", store.series().len(), series_visits);
            println!();
            println!("Config file: {}", config_file.display());
        }
    }

    Ok(())
}

/// Bytes used on disk by the configured backend
fn storage_size(config: &Config) -> u64 {
    match config.storage {
        StorageBackend::File => {
            let links = format!("{}-{}", keys::NAMESPACE, keys::LINKS);
            let series = format!("{}-{}", keys::NAMESPACE, keys::SERIES);
            FileStore::new(&config.data_dir).size_of(&[links.as_str(), series.as_str()])
        }
        StorageBackend::Sqlite => fs::metadata(config.sqlite_path())
            .map(|meta| meta.len())
            .unwrap_or(0),
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
