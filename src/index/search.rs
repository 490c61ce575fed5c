//! Free-text search with fixed per-field weights

use indexmap::IndexSet;
use regex::Regex;
use serde::Serialize;

use super::newest_first;
use crate::content::{ContentItem, ContentType, Difficulty};

/// Weight added when a query term appears in the title
pub const TITLE_WEIGHT: u32 = 10;
/// Weight added when a query term appears in any tag
pub const TAG_WEIGHT: u32 = 6;
/// Weight added when a query term appears in any topic
pub const TOPIC_WEIGHT: u32 = 6;
/// Weight added when a query term appears in the description
pub const DESCRIPTION_WEIGHT: u32 = 4;
/// Weight added when a query term appears in the body
pub const BODY_WEIGHT: u32 = 1;

/// Most suggestions returned for one query
pub const MAX_SUGGESTIONS: usize = 5;
/// Shorter queries get no suggestions
pub const MIN_SUGGESTION_QUERY: usize = 2;

const HIGHLIGHT_OPEN: &str = r#"<mark class="bg-yellow-200 dark:bg-yellow-800">"#;
const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Narrows the candidate set before scoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub content_type: Option<ContentType>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
}

impl SearchFilters {
    pub fn with_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn accepts(&self, item: &ContentItem) -> bool {
        self.content_type.map_or(true, |t| item.content_type == t)
            && self.category.as_ref().map_or(true, |c| &item.category == c)
            && self.difficulty.map_or(true, |d| item.difficulty == d)
            && self.tag.as_ref().map_or(true, |tag| {
                let tag = tag.to_lowercase();
                item.tags.iter().any(|t| t.to_lowercase() == tag)
            })
    }
}

/// A matching item and its relevance score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<'a> {
    pub content: &'a ContentItem,
    pub score: u32,
}

/// Lowercased searchable fields of one item
struct Haystack {
    title: String,
    description: String,
    tags: Vec<String>,
    topics: Vec<String>,
    body: String,
}

impl Haystack {
    fn new(item: &ContentItem) -> Self {
        Self {
            title: item.title.to_lowercase(),
            description: item.description.to_lowercase(),
            tags: item.tags.iter().map(|t| t.to_lowercase()).collect(),
            topics: item.topics.iter().map(|t| t.to_lowercase()).collect(),
            body: item.body.to_lowercase(),
        }
    }

    fn score(&self, terms: &[String]) -> u32 {
        terms
            .iter()
            .map(|term| {
                let mut score = 0;
                if self.title.contains(term.as_str()) {
                    score += TITLE_WEIGHT;
                }
                if self.tags.iter().any(|t| t.contains(term.as_str())) {
                    score += TAG_WEIGHT;
                }
                if self.topics.iter().any(|t| t.contains(term.as_str())) {
                    score += TOPIC_WEIGHT;
                }
                if self.description.contains(term.as_str()) {
                    score += DESCRIPTION_WEIGHT;
                }
                if self.body.contains(term.as_str()) {
                    score += BODY_WEIGHT;
                }
                score
            })
            .sum()
    }
}

/// Score every accepted item against `query`.
///
/// An empty or whitespace-only query matches nothing. Results are ordered by
/// score descending, then date descending (undated last), then slug and
/// type ascending, so identical queries always return identical sequences.
pub fn search<'a>(
    items: &'a [ContentItem],
    query: &str,
    filters: &SearchFilters,
) -> Vec<SearchResult<'a>> {
    let terms: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult<'a>> = items
        .iter()
        .filter(|item| filters.accepts(item))
        .filter_map(|item| {
            let score = Haystack::new(item).score(&terms);
            (score > 0).then_some(SearchResult {
                content: item,
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| newest_first(a.content, b.content))
    });

    if let Some(limit) = filters.limit {
        results.truncate(limit);
    }

    tracing::debug!("Search {:?} matched {} items", query, results.len());
    results
}

/// Completions for a partial query.
///
/// Title words starting with the query (from items whose title contains it)
/// come first, then topics containing it. Items are visited newest first,
/// duplicates are dropped and at most [`MAX_SUGGESTIONS`] are returned.
pub fn suggestions(items: &[ContentItem], query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_SUGGESTION_QUERY {
        return Vec::new();
    }

    let mut ordered: Vec<&ContentItem> = items.iter().collect();
    ordered.sort_by(|a, b| newest_first(a, b));

    let mut found: IndexSet<String> = IndexSet::new();
    for item in ordered {
        if item.title.to_lowercase().contains(&query) {
            for word in item.title.split_whitespace() {
                if word.to_lowercase().starts_with(&query) {
                    found.insert(word.to_string());
                }
            }
        }
        for topic in &item.topics {
            if topic.to_lowercase().contains(&query) {
                found.insert(topic.clone());
            }
        }
        if found.len() >= MAX_SUGGESTIONS {
            break;
        }
    }

    found.into_iter().take(MAX_SUGGESTIONS).collect()
}

/// Wrap every case-insensitive occurrence of a query term in `<mark>`.
///
/// Text is returned unchanged for an empty query. Terms are matched
/// literally, longest first, so overlapping terms never nest marks.
pub fn highlight(text: &str, query: &str) -> String {
    let mut terms: Vec<&str> = query.split_whitespace().collect();
    if text.is_empty() || terms.is_empty() {
        return text.to_string();
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()));
    let pattern = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&format!("(?i){}", pattern)) {
        Ok(re) => re
            .replace_all(text, |caps: &regex::Captures| {
                format!("{}{}{}", HIGHLIGHT_OPEN, &caps[0], HIGHLIGHT_CLOSE)
            })
            .into_owned(),
        Err(e) => {
            tracing::warn!("Cannot highlight {:?}: {}", query, e);
            text.to_string()
        }
    }
}
