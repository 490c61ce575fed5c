//! Content index - the in-memory collection of loaded items and its queries
//!
//! The index is built once from the loader and never mutated afterwards.
//! Live reloads go through [`SharedIndex`], which swaps a freshly built
//! index in whole.

mod related;
mod search;
mod shared;

use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::content::{ContentItem, ContentLoader, ContentType, Difficulty, LoadFailure};
use crate::error::{Result, SiteError};

pub use related::{related_to, relatedness_score, Related};
pub use related::{CATEGORY_WEIGHT, FORMAT_WEIGHT, SHARED_TAG_WEIGHT, SHARED_TOPIC_WEIGHT};
pub use search::{highlight, SearchFilters, SearchResult, MAX_SUGGESTIONS, MIN_SUGGESTION_QUERY};
pub use search::{BODY_WEIGHT, DESCRIPTION_WEIGHT, TAG_WEIGHT, TITLE_WEIGHT, TOPIC_WEIGHT};
pub use shared::{IndexState, SharedIndex};

/// A name with the number of items carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub name: String,
    pub count: usize,
}

/// Aggregate counts over the index
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentStats {
    pub total: usize,
    pub by_type: IndexMap<String, usize>,
    pub by_category: IndexMap<String, usize>,
    pub by_difficulty: IndexMap<String, usize>,
}

/// Immutable collection of content items
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    items: Vec<ContentItem>,
    failures: Vec<LoadFailure>,
}

impl ContentIndex {
    /// Build the index by loading every configured content root
    pub fn build(loader: &ContentLoader<'_>) -> Self {
        let report = loader.load_all();
        if !report.failures.is_empty() {
            tracing::warn!(
                "{} documents could not be loaded and were skipped",
                report.failures.len()
            );
        }
        tracing::info!("Indexed {} content items", report.items.len());
        Self {
            items: report.items,
            failures: report.failures,
        }
    }

    /// Build an index over already loaded items
    pub fn from_items(items: Vec<ContentItem>) -> Self {
        Self {
            items,
            failures: Vec::new(),
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Documents skipped while building this index
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// All items of one type, in load order
    pub fn get_content_by_type(&self, content_type: ContentType) -> Vec<&ContentItem> {
        self.items
            .iter()
            .filter(|item| item.content_type == content_type)
            .collect()
    }

    /// Items whose category matches exactly (case-sensitive)
    pub fn get_content_by_category(&self, category: &str) -> Vec<&ContentItem> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }

    pub fn get_content_by_slug(&self, content_type: ContentType, slug: &str) -> Option<&ContentItem> {
        self.items
            .iter()
            .find(|item| item.content_type == content_type && item.slug == slug)
    }

    /// Like [`get_content_by_slug`](Self::get_content_by_slug), failing with
    /// [`SiteError::NotFound`] when no item matches
    pub fn require(&self, content_type: ContentType, slug: &str) -> Result<&ContentItem> {
        self.get_content_by_slug(content_type, slug)
            .ok_or_else(|| SiteError::NotFound(format!("No {} item with slug {}", content_type, slug)))
    }

    /// Items carrying a tag, compared case-insensitively
    pub fn get_content_by_tag(&self, tag: &str) -> Vec<&ContentItem> {
        let tag = tag.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.tags.iter().any(|t| t.to_lowercase() == tag))
            .collect()
    }

    pub fn get_content_by_difficulty(&self, difficulty: Difficulty) -> Vec<&ContentItem> {
        self.items
            .iter()
            .filter(|item| item.difficulty == difficulty)
            .collect()
    }

    pub fn featured(&self) -> Vec<&ContentItem> {
        self.items.iter().filter(|item| item.featured).collect()
    }

    /// Dated items, newest first
    pub fn recent(&self, limit: usize) -> Vec<&ContentItem> {
        let mut dated: Vec<&ContentItem> =
            self.items.iter().filter(|item| item.date.is_some()).collect();
        dated.sort_by(|a, b| newest_first(a, b));
        dated.truncate(limit);
        dated
    }

    /// Categories with item counts, most used first
    pub fn categories(&self) -> Vec<TermCount> {
        count_terms(self.items.iter().map(|item| item.category.as_str()))
    }

    /// Tags with item counts, most used first
    pub fn tags(&self) -> Vec<TermCount> {
        count_terms(
            self.items
                .iter()
                .flat_map(|item| item.tags.iter().map(String::as_str)),
        )
    }

    pub fn stats(&self) -> ContentStats {
        let mut stats = ContentStats {
            total: self.items.len(),
            ..Default::default()
        };
        for item in &self.items {
            *stats
                .by_type
                .entry(item.content_type.to_string())
                .or_insert(0) += 1;
            *stats.by_category.entry(item.category.clone()).or_insert(0) += 1;
            *stats
                .by_difficulty
                .entry(item.difficulty.to_string())
                .or_insert(0) += 1;
        }
        stats
    }

    /// Free-text search, see [`search::search`]
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Vec<SearchResult<'_>> {
        search::search(&self.items, query, filters)
    }

    /// Query completions, see [`search::suggestions`]
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        search::suggestions(&self.items, query)
    }

    /// Items most related to `source`, see [`related_to`]
    pub fn related_to(&self, source: &ContentItem, limit: usize) -> Vec<Related<'_>> {
        related_to(source, &self.items, limit)
    }
}

/// Date descending (undated last), then slug and type ascending
pub(crate) fn newest_first(a: &ContentItem, b: &ContentItem) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.slug.cmp(&b.slug))
        .then_with(|| a.content_type.cmp(&b.content_type))
}

fn count_terms<'a>(terms: impl Iterator<Item = &'a str>) -> Vec<TermCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }
    let mut counts: Vec<TermCount> = counts
        .into_iter()
        .map(|(name, count)| TermCount {
            name: name.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::{TimeZone, Utc};

    /// Build an item with the fields the queries look at
    pub fn item(
        content_type: ContentType,
        slug: &str,
        date: Option<(i32, u32, u32)>,
        category: &str,
        tags: &[&str],
    ) -> ContentItem {
        let mut item = ContentItem::new(content_type, slug, slug);
        item.date = date.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap());
        item.category = category.to_string();
        item.tags = tags.iter().map(|t| t.to_string()).collect();
        item
    }
}
