//! Most-visited view

use anyhow::Result;

use bookmarks_core::{top_ranked, Store};

use crate::output::Output;

pub fn show(store: &Store, limit: usize, output: &Output) -> Result<()> {
    let links = top_ranked(store.links(), limit);
    let series = top_ranked(store.series(), limit);
    output.print_top(&links, &series);
    Ok(())
}
