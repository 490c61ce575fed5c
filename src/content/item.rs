//! Content item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::helpers::{encode_segment, within_days};

/// Kind of document, decided by the content root it was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Whitepaper,
    Learning,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [
        ContentType::Blog,
        ContentType::Whitepaper,
        ContentType::Learning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Whitepaper => "whitepaper",
            ContentType::Learning => "learning",
        }
    }

    /// Route prefix used to build `href`
    pub fn route_prefix(&self) -> &'static str {
        match self {
            ContentType::Blog => "/blog",
            ContentType::Whitepaper => "/white-papers",
            ContentType::Learning => "/learn",
        }
    }

    /// Rendering hint used when front-matter names none
    pub fn default_format(&self) -> Format {
        match self {
            ContentType::Blog => Format::Article,
            ContentType::Whitepaper => Format::Whitepaper,
            ContentType::Learning => Format::Learning,
        }
    }

    pub fn href(&self, slug: &str) -> String {
        format!("{}/{}", self.route_prefix(), encode_segment(slug))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blog" | "blogs" | "post" | "posts" => Ok(ContentType::Blog),
            "whitepaper" | "whitepapers" | "white-paper" | "white-papers" => {
                Ok(ContentType::Whitepaper)
            }
            "learning" | "learn" => Ok(ContentType::Learning),
            other => Err(format!(
                "Unknown content type: {}. Available: {}",
                other,
                ContentType::ALL
                    .iter()
                    .map(ContentType::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Rendering hint, distinct from [`ContentType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Article,
    Whitepaper,
    Learning,
    Architecture,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Article => "article",
            Format::Whitepaper => "whitepaper",
            Format::Learning => "learning",
            Format::Architecture => "architecture",
        }
    }

    /// Map a legacy front-matter `type` label onto a format
    pub fn from_type_label(label: &str) -> Format {
        match label.trim().to_ascii_lowercase().as_str() {
            "whitepaper" => Format::Whitepaper,
            "learning" | "tutorial" => Format::Learning,
            "architecture" | "reference" => Format::Architecture,
            _ => Format::Article,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

/// Knowledge-hub domain a document is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Infrastructure,
    Security,
    Compliance,
    Operations,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Infrastructure => "infrastructure",
            Domain::Security => "security",
            Domain::Compliance => "compliance",
            Domain::Operations => "operations",
        }
    }

    /// Domain for an explicit front-matter category
    pub fn from_category(category: &str) -> Domain {
        match category {
            "infrastructure" => Domain::Infrastructure,
            "compliance" => Domain::Compliance,
            "operations" | "industry" => Domain::Operations,
            _ => Domain::Security,
        }
    }

    /// Domain guessed from the directory a document lives in
    pub fn from_path(relative_dir: &str) -> Domain {
        if relative_dir.contains("security") {
            Domain::Security
        } else if relative_dir.contains("infrastructure") {
            Domain::Infrastructure
        } else if relative_dir.contains("compliance") {
            Domain::Compliance
        } else {
            Domain::Operations
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized content document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Filename without extension
    pub slug: String,

    #[serde(rename = "type")]
    pub content_type: ContentType,

    pub title: String,

    pub description: String,

    /// Publication date; undated items stay out of feeds
    pub date: Option<DateTime<Utc>>,

    /// Last modification date from front-matter
    pub updated: Option<DateTime<Utc>>,

    pub author: String,

    pub category: String,

    pub domain: Domain,

    /// Ordered topic labels
    pub topics: Vec<String>,

    pub tags: BTreeSet<String>,

    pub format: Format,

    pub difficulty: Difficulty,

    /// Display string such as "10 min read"
    pub read_time: String,

    pub featured: bool,

    /// Route path derived from type and slug
    pub href: String,

    /// Raw Markdown/MDX body
    #[serde(skip_serializing, default)]
    pub body: String,

    /// File path relative to its content root
    pub source: PathBuf,
}

impl ContentItem {
    /// Create an item with defaults for everything but identity and title
    pub fn new(content_type: ContentType, slug: impl Into<String>, title: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            href: content_type.href(&slug),
            source: PathBuf::from(format!("{}.mdx", slug)),
            slug,
            content_type,
            title: title.into(),
            description: String::new(),
            date: None,
            updated: None,
            author: "perfecXion Security Team".to_string(),
            category: "uncategorized".to_string(),
            domain: Domain::Security,
            topics: Vec::new(),
            tags: BTreeSet::new(),
            format: content_type.default_format(),
            difficulty: Difficulty::default(),
            read_time: "1 min read".to_string(),
            featured: false,
            body: String::new(),
        }
    }

    /// Identifier unique across content types
    pub fn id(&self) -> String {
        format!("{}/{}", self.content_type, self.slug)
    }

    /// Whether the item was published within `days` days of `now`
    pub fn is_new(&self, now: &DateTime<Utc>, days: i64) -> bool {
        self.date
            .as_ref()
            .map(|d| within_days(d, now, days))
            .unwrap_or(false)
    }

    /// Most recent known change, for sitemaps
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.date)
    }
}

/// An item as served to clients, with its recency flag
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView<'a> {
    #[serde(flatten)]
    pub item: &'a ContentItem,
    pub is_new: bool,
}

impl<'a> ItemView<'a> {
    pub fn new(item: &'a ContentItem, now: &DateTime<Utc>, new_days: i64) -> Self {
        Self {
            item,
            is_new: item.is_new(now, new_days),
        }
    }
}
