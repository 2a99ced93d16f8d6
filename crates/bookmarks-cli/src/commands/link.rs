//! Link command handlers

use anyhow::{Context, Result};

use bookmarks_core::{filter_links, CategoryFilter, NewLink, Store};

use super::{confirm, open_in_browser, resolve_id};
use crate::output::{short_id, Output};

/// Add a new link
pub fn add(
    store: &mut Store,
    title: String,
    url: String,
    category: String,
    output: &Output,
) -> Result<()> {
    if !store.categories().iter().any(|c| c == category.trim()) {
        output.warn(&format!(
            "'{}' is not one of the configured categories ({})",
            category,
            store.categories().join(", ")
        ));
    }

    let notice = store
        .add_link(NewLink::new(title, url, category))
        .context("Failed to add link")?;

    output.notice(&notice);
    if let Some(link) = store.links().first() {
        output.print_link(link);
    }

    Ok(())
}

/// List links, optionally filtered by search text and category
pub fn list(
    store: &Store,
    search: Option<String>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let links = filter_links(
        store.links(),
        search.as_deref().unwrap_or(""),
        &CategoryFilter::from(category),
    );
    output.print_links(&links);
    Ok(())
}

/// Show a single link
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let id = parse_link_id(&id, store)?;
    if let Some(link) = store.find_link(&id) {
        output.print_link(link);
    }
    Ok(())
}

/// Record a visit, optionally opening the url
pub fn visit(store: &mut Store, id: String, open: bool, output: &Output) -> Result<()> {
    let id = parse_link_id(&id, store)?;
    let notice = store.visit_link(&id);
    output.notice(&notice);

    if open {
        if let Some(link) = store.find_link(&id) {
            open_in_browser(&link.url, output);
        }
    }

    Ok(())
}

/// Delete a link
pub fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let id = parse_link_id(&id, store)?;

    if output.should_prompt() {
        if let Some(link) = store.find_link(&id) {
            println!("Delete link: {} - {}", short_id(&link.id), link.title);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let notice = store.delete_link(&id);
    output.notice(&notice);

    Ok(())
}

/// List the configured category labels
pub fn categories(store: &Store, output: &Output) -> Result<()> {
    output.print_categories(store.categories());
    Ok(())
}

fn parse_link_id(id: &str, store: &Store) -> Result<String> {
    resolve_id(
        "link",
        id,
        store
            .links()
            .iter()
            .map(|l| (l.id.as_str(), l.title.as_str())),
    )
}
