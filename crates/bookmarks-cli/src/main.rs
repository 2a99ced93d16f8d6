//! Bookmarks CLI
//!
//! Command-line interface for bookmarks - saved links and series progress.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bookmarks_core::{Config, Store};

mod commands;
mod output;

use commands::series::Step;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "bookmarks")]
#[command(about = "Bookmarks - saved links and series watch progress")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Manage series
    Series {
        #[command(subcommand)]
        command: SeriesCommands,
    },
    /// Show the most visited links and series
    Top {
        /// Number of entries per collection
        #[arg(short, long, default_value_t = bookmarks_core::view::DEFAULT_TOP_LIMIT)]
        limit: usize,
    },
    /// List the configured link categories
    Categories,
    /// Write a backup of all data
    Export {
        /// Target directory or file (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all data with the contents of a backup
    Import {
        /// Backup file (.json)
        file: PathBuf,
        /// Reject the backup if any entry is invalid
        #[arg(long)]
        strict: bool,
    },
    /// Show storage status and counts
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Add a new link
    #[command(alias = "create")]
    Add {
        /// Display title
        title: String,
        /// URL to save
        url: String,
        /// Category label
        #[arg(short, long)]
        category: String,
    },
    /// List links
    #[command(alias = "ls")]
    List {
        /// Case-insensitive search over title and url
        #[arg(short, long)]
        search: Option<String>,
        /// Category to show, or "all"
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show link details
    Show {
        /// Link ID (full ID or prefix)
        id: String,
    },
    /// Record a visit to a link
    Visit {
        /// Link ID (full ID or prefix)
        id: String,
        /// Open the url in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link ID (full ID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum SeriesCommands {
    /// Add a new series
    #[command(alias = "create")]
    Add {
        /// Display title
        title: String,
        /// Where the series is watched
        url: String,
        /// Current season
        #[arg(long)]
        season: Option<u32>,
        /// Current episode
        #[arg(long)]
        episode: Option<u32>,
        /// Number of seasons, if known
        #[arg(long)]
        total_seasons: Option<u32>,
        /// Episodes per season, if known
        #[arg(long)]
        total_episodes: Option<u32>,
        /// Poster image url
        #[arg(long)]
        poster: Option<String>,
    },
    /// List series
    #[command(alias = "ls")]
    List {
        /// Case-insensitive search over title
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show series details
    Show {
        /// Series ID (full ID or prefix)
        id: String,
    },
    /// Record a visit to a series
    Visit {
        /// Series ID (full ID or prefix)
        id: String,
        /// Open the url in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Set the current season and episode
    Progress {
        /// Series ID (full ID or prefix)
        id: String,
        season: u32,
        episode: u32,
    },
    /// Advance to the next episode
    NextEpisode { id: String },
    /// Go back one episode
    PrevEpisode { id: String },
    /// Advance to the next season
    NextSeason { id: String },
    /// Go back one season
    PrevSeason { id: String },
    /// Delete a series
    #[command(alias = "rm")]
    Delete {
        /// Series ID (full ID or prefix)
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, storage, categories, favicon_size, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work without opening the store
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let mut store = Store::open_with_config(config)?;

    match cli.command {
        Commands::Link { command } => handle_link_command(command, &mut store, &output),
        Commands::Series { command } => handle_series_command(command, &mut store, &output),
        Commands::Top { limit } => commands::top::show(&store, limit, &output),
        Commands::Categories => commands::link::categories(&store, &output),
        Commands::Export { output: target } => commands::data::export(&store, target, &output),
        Commands::Import { file, strict } => {
            commands::data::import(&mut store, file, strict, &output)
        }
        Commands::Status => commands::status::show(&store, config_path, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_link_command(command: LinkCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        LinkCommands::Add {
            title,
            url,
            category,
        } => commands::link::add(store, title, url, category, output),
        LinkCommands::List { search, category } => {
            commands::link::list(store, search, category, output)
        }
        LinkCommands::Show { id } => commands::link::show(store, id, output),
        LinkCommands::Visit { id, open } => commands::link::visit(store, id, open, output),
        LinkCommands::Delete { id } => commands::link::delete(store, id, output),
    }
}

fn handle_series_command(
    command: SeriesCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        SeriesCommands::Add {
            title,
            url,
            season,
            episode,
            total_seasons,
            total_episodes,
            poster,
        } => {
            let input = commands::series::SeriesArgs {
                title,
                url,
                season,
                episode,
                total_seasons,
                total_episodes,
                poster,
            };
            commands::series::add(store, input, output)
        }
        SeriesCommands::List { search } => commands::series::list(store, search, output),
        SeriesCommands::Show { id } => commands::series::show(store, id, output),
        SeriesCommands::Visit { id, open } => commands::series::visit(store, id, open, output),
        SeriesCommands::Progress {
            id,
            season,
            episode,
        } => commands::series::progress(store, id, season, episode, output),
        SeriesCommands::NextEpisode { id } => {
            commands::series::step(store, id, Step::NextEpisode, output)
        }
        SeriesCommands::PrevEpisode { id } => {
            commands::series::step(store, id, Step::PreviousEpisode, output)
        }
        SeriesCommands::NextSeason { id } => {
            commands::series::step(store, id, Step::NextSeason, output)
        }
        SeriesCommands::PrevSeason { id } => {
            commands::series::step(store, id, Step::PreviousSeason, output)
        }
        SeriesCommands::Delete { id } => commands::series::delete(store, id, output),
    }
}

/// Log to a file when BOOKMARKS_LOG is set
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("BOOKMARKS_LOG") else {
        return;
    };

    let log_path = config.log_path();
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "bookmarks_core={},bookmarks_cli={}",
        log_level, log_level
    ));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
