//! Search the index from the command line

use anyhow::Result;

use crate::content::ContentType;
use crate::index::SearchFilters;
use crate::Site;

pub fn run(
    site: &Site,
    query: &str,
    content_type: Option<&str>,
    category: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let mut filters = SearchFilters::default();
    if let Some(content_type) = content_type {
        let content_type: ContentType = content_type.parse().map_err(anyhow::Error::msg)?;
        filters = filters.with_type(content_type);
    }
    if let Some(category) = category {
        filters = filters.with_category(category);
    }
    if let Some(limit) = limit {
        filters = filters.with_limit(limit);
    }

    let index = site.load_index();
    let results = index.search(query, &filters);

    println!("Results for {:?} ({}):", query, results.len());
    for result in results {
        println!(
            "  {:>3}  {:<10} {} [{}]",
            result.score, result.content.content_type, result.content.title, result.content.href
        );
    }

    Ok(())
}

/// Print completions for a partial query
pub fn suggest(site: &Site, query: &str) -> Result<()> {
    let index = site.load_index();
    let suggestions = index.suggestions(query);
    if suggestions.is_empty() {
        println!("No suggestions for {:?}", query);
    }
    for suggestion in suggestions {
        println!("  {}", suggestion);
    }
    Ok(())
}
