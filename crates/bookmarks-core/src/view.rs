//! Derived views over the collections
//!
//! Pure functions that filter, search and rank links and series for
//! display. They borrow from the collections and never mutate them.

use crate::models::{Link, Series};

/// Sentinel category meaning "no category filter", matched exactly
pub const ALL_CATEGORIES: &str = "all";

/// Default number of entries in the "most accessed" view
pub const DEFAULT_TOP_LIMIT: usize = 2;

/// Category selection for link filtering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }
}

impl From<Option<String>> for CategoryFilter {
    fn from(s: Option<String>) -> Self {
        s.as_deref().map(CategoryFilter::from).unwrap_or_default()
    }
}

/// Entries that can be ranked by visit count
pub trait Ranked {
    fn click_count(&self) -> u64;
}

impl Ranked for Link {
    fn click_count(&self) -> u64 {
        self.click_count
    }
}

impl Ranked for Series {
    fn click_count(&self) -> u64 {
        self.click_count
    }
}

/// Links whose title or url contains `search` (case-insensitive) and whose
/// category passes `category`
pub fn filter_links<'a>(
    links: &'a [Link],
    search: &str,
    category: &CategoryFilter,
) -> Vec<&'a Link> {
    let needle = search.to_lowercase();
    links
        .iter()
        .filter(|link| {
            link.title.to_lowercase().contains(&needle) || link.url.to_lowercase().contains(&needle)
        })
        .filter(|link| category.matches(&link.category))
        .collect()
}

/// Series whose title contains `search` (case-insensitive)
pub fn filter_series<'a>(series: &'a [Series], search: &str) -> Vec<&'a Series> {
    let needle = search.to_lowercase();
    series
        .iter()
        .filter(|s| s.title.to_lowercase().contains(&needle))
        .collect()
}

/// The most visited entries, highest count first
///
/// Entries never visited are excluded. Ties keep collection order.
pub fn top_ranked<T: Ranked>(items: &[T], limit: usize) -> Vec<&T> {
    let mut ranked: Vec<&T> = items.iter().filter(|item| item.click_count() > 0).collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.click_count().cmp(&a.click_count()));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewLink, NewSeries};

    fn link(id: &str, title: &str, url: &str, category: &str, clicks: u64) -> Link {
        let mut link = Link::create(id, NewLink::new(title, url, category), 64).unwrap();
        link.click_count = clicks;
        link
    }

    fn series(id: &str, title: &str, clicks: u64) -> Series {
        let mut series = Series::create(id, NewSeries::new(title, "https://tv.example")).unwrap();
        series.click_count = clicks;
        series
    }

    fn sample_links() -> Vec<Link> {
        vec![
            link("1", "Rust Blog", "https://blog.rust-lang.org", "Technology", 0),
            link("2", "Recipes", "https://cooking.example", "Other", 0),
            link("3", "Docs", "https://docs.RS", "Technology", 0),
        ]
    }

    fn link_ids(items: &[&Link]) -> Vec<String> {
        items.iter().map(|l| l.id.clone()).collect()
    }

    fn series_ids(items: &[&Series]) -> Vec<String> {
        items.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_filter_links_empty_search_matches_all() {
        let links = sample_links();
        assert_eq!(filter_links(&links, "", &CategoryFilter::All).len(), 3);
    }

    #[test]
    fn test_filter_links_by_title_case_insensitive() {
        let links = sample_links();
        let result = filter_links(&links, "rUsT", &CategoryFilter::All);
        assert_eq!(link_ids(&result), vec!["1"]);
    }

    #[test]
    fn test_filter_links_by_url() {
        let links = sample_links();
        let result = filter_links(&links, "docs.rs", &CategoryFilter::All);
        assert_eq!(link_ids(&result), vec!["3"]);
    }

    #[test]
    fn test_filter_links_by_category() {
        let links = sample_links();
        let result = filter_links(&links, "", &CategoryFilter::from("Technology"));
        assert_eq!(link_ids(&result), vec!["1", "3"]);

        // Exact match only
        let result = filter_links(&links, "", &CategoryFilter::from("technology"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_links_search_and_category_combine() {
        let links = sample_links();
        let result = filter_links(&links, "recipes", &CategoryFilter::from("Technology"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_category_filter_sentinel() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from(None), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from(Some("News".to_string())),
            CategoryFilter::Only("News".to_string())
        );
    }

    #[test]
    fn test_category_named_all_is_selectable() {
        let mut links = sample_links();
        links.push(link("4", "Everything", "https://e.example", "All", 0));

        assert_eq!(
            CategoryFilter::from("All"),
            CategoryFilter::Only("All".to_string())
        );
        let result = filter_links(&links, "", &CategoryFilter::from("All"));
        assert_eq!(link_ids(&result), vec!["4"]);
        assert_eq!(filter_links(&links, "", &CategoryFilter::from("all")).len(), 4);
    }

    #[test]
    fn test_filter_series_matches_title_only() {
        let list = vec![series("a", "The Expanse", 0), series("b", "Dark", 0)];
        let result = filter_series(&list, "EXPANSE");
        assert_eq!(series_ids(&result), vec!["a"]);

        // The url is not searched
        assert!(filter_series(&list, "tv.example").is_empty());
    }

    #[test]
    fn test_top_ranked_orders_by_clicks() {
        let links = vec![
            link("1", "A", "https://a.com", "x", 1),
            link("2", "B", "https://b.com", "x", 5),
            link("3", "C", "https://c.com", "x", 3),
        ];
        let top = top_ranked(&links, DEFAULT_TOP_LIMIT);
        assert_eq!(link_ids(&top), vec!["2", "3"]);
    }

    #[test]
    fn test_top_ranked_excludes_unvisited() {
        let links = vec![
            link("1", "A", "https://a.com", "x", 0),
            link("2", "B", "https://b.com", "x", 2),
        ];
        let top = top_ranked(&links, 5);
        assert_eq!(link_ids(&top), vec!["2"]);
        assert!(top_ranked(&links[..1], 5).is_empty());
    }

    #[test]
    fn test_top_ranked_ties_keep_collection_order() {
        let list = vec![
            series("a", "A", 2),
            series("b", "B", 4),
            series("c", "C", 2),
            series("d", "D", 2),
        ];
        let top = top_ranked(&list, 3);
        assert_eq!(series_ids(&top), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_top_ranked_respects_limit() {
        let links: Vec<Link> = (1..=10)
            .map(|i| link(&i.to_string(), "T", "https://t.com", "x", i))
            .collect();
        for limit in 0..12 {
            let top = top_ranked(&links, limit);
            assert!(top.len() <= limit);
            assert!(top.iter().all(|l| l.click_count > 0));
            assert!(top.windows(2).all(|w| w[0].click_count >= w[1].click_count));
        }
    }
}
