//! Series command handlers

use anyhow::{Context, Result};

use bookmarks_core::{filter_series, NewSeries, Store};

use super::{confirm, open_in_browser, resolve_id};
use crate::output::{short_id, Output};

/// Arguments of `series add`
pub struct SeriesArgs {
    pub title: String,
    pub url: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub total_seasons: Option<u32>,
    pub total_episodes: Option<u32>,
    pub poster: Option<String>,
}

impl From<SeriesArgs> for NewSeries {
    fn from(args: SeriesArgs) -> Self {
        NewSeries {
            title: args.title,
            url: args.url,
            current_season: args.season,
            current_episode: args.episode,
            total_seasons: args.total_seasons,
            total_episodes: args.total_episodes,
            poster: args.poster,
        }
    }
}

/// Single-step progress changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    NextEpisode,
    PreviousEpisode,
    NextSeason,
    PreviousSeason,
}

/// Add a new series
pub fn add(store: &mut Store, args: SeriesArgs, output: &Output) -> Result<()> {
    let notice = store
        .add_series(args.into())
        .context("Failed to add series")?;

    output.notice(&notice);
    if let Some(series) = store.series().first() {
        output.print_series(series);
    }

    Ok(())
}

/// List series, optionally filtered by search text
pub fn list(store: &Store, search: Option<String>, output: &Output) -> Result<()> {
    let list = filter_series(store.series(), search.as_deref().unwrap_or(""));
    output.print_series_list(&list);
    Ok(())
}

/// Show a single series
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let id = parse_series_id(&id, store)?;
    if let Some(series) = store.find_series(&id) {
        output.print_series(series);
    }
    Ok(())
}

/// Record a visit, optionally opening the url
pub fn visit(store: &mut Store, id: String, open: bool, output: &Output) -> Result<()> {
    let id = parse_series_id(&id, store)?;
    let notice = store.visit_series(&id);
    output.notice(&notice);

    if open {
        if let Some(series) = store.find_series(&id) {
            open_in_browser(&series.url, output);
        }
    }

    Ok(())
}

/// Set the current season and episode
pub fn progress(
    store: &mut Store,
    id: String,
    season: u32,
    episode: u32,
    output: &Output,
) -> Result<()> {
    let id = parse_series_id(&id, store)?;
    let notice = store
        .update_series_episode(&id, season, episode)
        .context("Failed to update progress")?;

    output.notice(&notice);
    Ok(())
}

/// Move progress one step
pub fn step(store: &mut Store, id: String, step: Step, output: &Output) -> Result<()> {
    let id = parse_series_id(&id, store)?;
    let notice = match step {
        Step::NextEpisode => store.next_episode(&id),
        Step::PreviousEpisode => store.previous_episode(&id),
        Step::NextSeason => store.next_season(&id),
        Step::PreviousSeason => store.previous_season(&id),
    };

    output.notice(&notice);
    Ok(())
}

/// Delete a series
pub fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let id = parse_series_id(&id, store)?;

    if output.should_prompt() {
        if let Some(series) = store.find_series(&id) {
            println!("Delete series: {} - {}", short_id(&series.id), series.title);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let notice = store.delete_series(&id);
    output.notice(&notice);

    Ok(())
}

fn parse_series_id(id: &str, store: &Store) -> Result<String> {
    resolve_id(
        "series",
        id,
        store
            .series()
            .iter()
            .map(|s| (s.id.as_str(), s.title.as_str())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_args_into_new_series() {
        let args = SeriesArgs {
            title: "Show".to_string(),
            url: "https://tv.example".to_string(),
            season: Some(2),
            episode: None,
            total_seasons: Some(4),
            total_episodes: None,
            poster: None,
        };
        let input = NewSeries::from(args);

        assert_eq!(input.title, "Show");
        assert_eq!(input.current_season, Some(2));
        assert_eq!(input.current_episode, None);
        assert_eq!(input.total_seasons, Some(4));
    }
}
