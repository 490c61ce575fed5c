//! Front-matter parsing
//!
//! Documents open with a YAML block delimited by `---` lines. The block is
//! validated against a typed schema: a block that is unterminated, not valid
//! YAML, or carries a value of the wrong shape is rejected rather than
//! repaired, so the loader can report the file and move on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use thiserror::Error;

use super::{Difficulty, Format};
use crate::helpers::parse_date_string;

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front-matter block opened with --- is never closed")]
    Unterminated,

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unrecognized {field} value: {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

/// A list entry written as a bare YAML scalar
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Custom deserializer that handles both a single scalar and a list of
/// scalars. Numbers and booleans (`tags: 2024`) are kept as their text.
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<Scalar>()? {
                vec.push(item.into());
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Author given either as a bare name or as a profile mapping
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Profile { name: String, role: Option<String> },
}

impl Author {
    pub fn name(&self) -> &str {
        match self {
            Author::Name(name) => name,
            Author::Profile { name, .. } => name,
        }
    }
}

/// `readTime` given as display text or as a bare minute count
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReadTime {
    Minutes(u32),
    Fractional(f64),
    Text(String),
}

/// Front-matter data from a content document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    #[serde(alias = "publishedAt")]
    pub date: Option<String>,
    #[serde(alias = "lastModified", alias = "updatedAt")]
    pub updated: Option<String>,
    pub author: Option<Author>,
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub topics: Vec<String>,
    /// Legacy document kind (`blog`, `tutorial`, `reference`, ...)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub format: Option<Format>,
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "readTime")]
    pub read_time: Option<ReadTime>,
    #[serde(rename = "readingTime")]
    pub reading_time: Option<f64>,
    pub featured: bool,
    pub draft: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let (yaml, body) = split(content)?;

        let fm = match yaml {
            Some(yaml) if has_entries(yaml) => serde_yaml::from_str::<FrontMatter>(yaml)?,
            _ => FrontMatter::default(),
        };

        // Dates are checked here so a bad value rejects the whole document
        fm.parse_date()?;
        fm.parse_updated()?;

        Ok((fm, body))
    }

    /// Parse the publication date, if any
    pub fn parse_date(&self) -> Result<Option<DateTime<Utc>>, FrontMatterError> {
        parse_optional_date("date", self.date.as_deref())
    }

    /// Parse the last-modified date, if any
    pub fn parse_updated(&self) -> Result<Option<DateTime<Utc>>, FrontMatterError> {
        parse_optional_date("updated", self.updated.as_deref())
    }
}

/// Split a document into its raw YAML block (if any) and body
pub fn split(content: &str) -> Result<(Option<&str>, &str), FrontMatterError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let Some(after_open) = strip_delimiter_line(content) else {
        return Ok((None, content));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &after_open[..offset];
            let body = after_open[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated)
}

/// Strip an opening `---` line, returning the rest
fn strip_delimiter_line(content: &str) -> Option<&str> {
    let first_line_end = content.find('\n').unwrap_or(content.len());
    if content[..first_line_end].trim_end() != "---" {
        return None;
    }
    Some(content.get(first_line_end + 1..).unwrap_or(""))
}

/// Whether a YAML block holds anything besides blank lines and comments
fn has_entries(yaml: &str) -> bool {
    yaml.lines().any(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !trimmed.starts_with('#')
    })
}

fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, FrontMatterError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_date_string(raw)
            .map(Some)
            .ok_or_else(|| FrontMatterError::InvalidDate {
                field,
                value: raw.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
author: Jane Analyst
category: security
tags:
  - llm
  - red-team
topics: [Prompt Injection]
difficulty: advanced
readingTime: 12
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.tags, vec!["llm", "red-team"]);
        assert_eq!(fm.topics, vec!["Prompt Injection"]);
        assert_eq!(fm.category.as_deref(), Some("security"));
        assert_eq!(fm.difficulty, Some(Difficulty::Advanced));
        assert_eq!(fm.reading_time, Some(12.0));
        assert_eq!(fm.author.as_ref().map(Author::name), Some("Jane Analyst"));
        assert!(fm.parse_date().unwrap().is_some());
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: Single Tag\ntags: Notes\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_numeric_and_boolean_tags_become_text() {
        let content = "---\ntitle: Year\ntags: 2024\ntopics: [LLM, 2024, 1.5, true]\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["2024"]);
        assert_eq!(fm.topics, vec!["LLM", "2024", "1.5", "true"]);

        let (fm, _) = FrontMatter::parse("---\ntags: false\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["false"]);
    }

    #[test]
    fn test_fractional_read_time() {
        let (fm, _) = FrontMatter::parse("---\nreadTime: 7.5\n---\n").unwrap();
        assert_eq!(fm.read_time, Some(ReadTime::Fractional(7.5)));

        let (fm, _) = FrontMatter::parse("---\nreadTime: 7\n---\n").unwrap();
        assert_eq!(fm.read_time, Some(ReadTime::Minutes(7)));
    }

    #[test]
    fn test_author_profile_and_aliases() {
        let content = r#"---
title: Paper
publishedAt: "2024-02-01"
lastModified: "2024-03-01"
author:
  name: Dr. Smith
  role: Researcher
readTime: "25 min read"
type: reference
---
"#;
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.author.as_ref().map(Author::name), Some("Dr. Smith"));
        assert_eq!(fm.date.as_deref(), Some("2024-02-01"));
        assert_eq!(fm.updated.as_deref(), Some("2024-03-01"));
        assert_eq!(fm.read_time, Some(ReadTime::Text("25 min read".to_string())));
        assert_eq!(fm.kind.as_deref(), Some("reference"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let content = "---\ntitle: T\ncoverImage: /img.png\nseries: basics\n---\nBody";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(fm.extra.contains_key("coverImage"));
        assert!(fm.extra.contains_key("series"));
    }

    #[test]
    fn test_no_frontmatter_is_all_body() {
        let content = "# Just markdown\n\nNo metadata here.";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.title.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let content = "---\n# only a comment\n---\nBody";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.title.is_none());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unbalanced_quotes_rejected() {
        let content = "---\ntitle: \"Broken title\ndate: 2024-01-01\n---\nBody";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(FrontMatterError::Yaml(_))
        ));
    }

    #[test]
    fn test_unterminated_block_rejected() {
        let content = "---\ntitle: Never closed\n\nBody text";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(FrontMatterError::Unterminated)
        ));
    }

    #[test]
    fn test_invalid_date_rejected() {
        let content = "---\ntitle: T\ndate: sometime soon\n---\n";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(FrontMatterError::InvalidDate { field: "date", .. })
        ));
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        let content = "---\ntitle: T\ndifficulty: expert\n---\n";
        assert!(FrontMatter::parse(content).is_err());
    }

    #[test]
    fn test_closing_delimiter_must_be_own_line() {
        let content = "---\ntitle: T\nnote: a --- b\n---\nBody --- still body";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("T"));
        assert_eq!(body, "Body --- still body");
    }
}
