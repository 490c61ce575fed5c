//! Relatedness scoring between content items

use serde::Serialize;

use super::newest_first;
use crate::content::ContentItem;

/// Points per tag shared with the source item
pub const SHARED_TAG_WEIGHT: u32 = 2;
/// Points per topic shared with the source item
pub const SHARED_TOPIC_WEIGHT: u32 = 1;
/// Points for an identical category
pub const CATEGORY_WEIGHT: u32 = 1;
/// Points for an identical format
pub const FORMAT_WEIGHT: u32 = 1;

/// A candidate and how strongly it relates to the source item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Related<'a> {
    pub content: &'a ContentItem,
    pub score: u32,
}

/// Similarity between two items
pub fn relatedness_score(source: &ContentItem, candidate: &ContentItem) -> u32 {
    let shared_tags = source.tags.intersection(&candidate.tags).count() as u32;
    let shared_topics = candidate
        .topics
        .iter()
        .filter(|topic| source.topics.contains(topic))
        .count() as u32;

    let mut score = shared_tags * SHARED_TAG_WEIGHT + shared_topics * SHARED_TOPIC_WEIGHT;
    if source.category == candidate.category {
        score += CATEGORY_WEIGHT;
    }
    if source.format == candidate.format {
        score += FORMAT_WEIGHT;
    }
    score
}

/// The `limit` candidates most related to `source`, never `source` itself.
///
/// Candidates are ordered by score, then newest first, then slug. Items that
/// share nothing score zero and sort after every scored item by date, so
/// they fill the remaining slots when fewer than `limit` items relate.
pub fn related_to<'a>(
    source: &ContentItem,
    candidates: &'a [ContentItem],
    limit: usize,
) -> Vec<Related<'a>> {
    let source_id = source.id();

    let mut related: Vec<Related<'a>> = candidates
        .iter()
        .filter(|candidate| candidate.id() != source_id)
        .map(|candidate| Related {
            content: candidate,
            score: relatedness_score(source, candidate),
        })
        .collect();

    related.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| newest_first(a.content, b.content))
    });
    related.truncate(limit);
    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentType, Format};
    use crate::index::fixtures::item;

    fn slugs<'a>(related: &[Related<'a>]) -> Vec<&'a str> {
        related.iter().map(|r| r.content.slug.as_str()).collect()
    }

    #[test]
    fn test_shared_tags_outweigh_category() {
        let source = item(ContentType::Blog, "src", None, "security", &["llm", "rag", "agents"]);

        let mut tag_match = item(ContentType::Blog, "tags", None, "research", &["llm", "rag", "agents"]);
        tag_match.format = Format::Whitepaper;

        let mut category_match = item(ContentType::Blog, "category", None, "security", &[]);
        category_match.format = Format::Learning;

        assert_eq!(relatedness_score(&source, &tag_match), 6);
        assert_eq!(relatedness_score(&source, &category_match), 1);

        let candidates = vec![category_match, tag_match];
        let related = related_to(&source, &candidates, 4);
        assert_eq!(slugs(&related), vec!["tags", "category"]);
    }

    #[test]
    fn test_topics_and_format_weights() {
        let mut source = item(ContentType::Blog, "src", None, "a", &[]);
        source.topics = vec!["RDMA".to_string(), "GPU Clusters".to_string()];

        let mut candidate = item(ContentType::Learning, "c", None, "b", &[]);
        candidate.topics = vec!["GPU Clusters".to_string(), "RDMA".to_string()];
        candidate.format = Format::Article;

        // two topics + same format (both articles)
        assert_eq!(relatedness_score(&source, &candidate), 3);
    }

    #[test]
    fn test_excludes_source_itself() {
        let source = item(ContentType::Blog, "same", Some((2024, 1, 1)), "x", &["t"]);
        let candidates = vec![
            source.clone(),
            item(ContentType::Learning, "same", Some((2024, 1, 1)), "x", &["t"]),
        ];
        let related = related_to(&source, &candidates, 4);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].content.content_type, ContentType::Learning);
    }

    #[test]
    fn test_pads_with_most_recent() {
        let source = item(ContentType::Blog, "src", None, "x", &["rare"]);
        let mut candidates = vec![
            item(ContentType::Blog, "match", Some((2020, 1, 1)), "y", &["rare"]),
            item(ContentType::Blog, "old", Some((2021, 1, 1)), "y", &[]),
            item(ContentType::Blog, "newest", Some((2024, 1, 1)), "y", &[]),
            item(ContentType::Blog, "undated", None, "y", &[]),
            item(ContentType::Blog, "middle", Some((2022, 1, 1)), "y", &[]),
        ];
        for candidate in candidates.iter_mut() {
            candidate.format = Format::Whitepaper;
        }

        let related = related_to(&source, &candidates, 4);
        assert_eq!(slugs(&related), vec!["match", "newest", "middle", "old"]);
        assert_eq!(related[1].score, 0);
    }

    #[test]
    fn test_small_pools() {
        let source = item(ContentType::Blog, "src", None, "x", &[]);
        assert!(related_to(&source, &[], 4).is_empty());

        let candidates = vec![item(ContentType::Blog, "only", None, "z", &[])];
        assert_eq!(related_to(&source, &candidates, 4).len(), 1);
    }
}
