//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::ContentType;
use crate::error::Result;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,

    // Directory
    pub public_dir: String,
    pub content_roots: Vec<ContentRoot>,

    // Content defaults
    pub default_category: String,
    /// Items dated within this many days are flagged as new
    pub new_days: i64,
    pub related_limit: usize,

    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
    pub search_index: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "PerfecXion AI Knowledge Hub".to_string(),
            description: "The definitive source for AI infrastructure and security knowledge - articles, white papers, and learning paths.".to_string(),
            author: "perfecXion Security Team".to_string(),
            language: "en-US".to_string(),

            url: "https://perfecxion.ai".to_string(),

            public_dir: "public".to_string(),
            content_roots: vec![
                ContentRoot::new("content/blog", ContentType::Blog),
                ContentRoot::new("content/white-papers", ContentType::Whitepaper),
                ContentRoot::new("content/learning", ContentType::Learning),
            ],

            default_category: "uncategorized".to_string(),
            new_days: 30,
            related_limit: 4,

            feed: FeedConfig::default(),
            sitemap: SitemapConfig::default(),
            search_index: "search.json".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// First configured root holding the given content type
    pub fn root_for(&self, content_type: ContentType) -> Option<&ContentRoot> {
        self.content_roots
            .iter()
            .find(|root| root.content_type == content_type)
    }
}

/// A directory of documents sharing one content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRoot {
    /// Directory relative to the site base (absolute paths are kept as-is)
    pub dir: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

impl ContentRoot {
    pub fn new(dir: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            dir: dir.into(),
            content_type,
        }
    }
}

/// RSS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub path: String,
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "rss.xml".to_string(),
            limit: 20,
        }
    }
}

/// Sitemap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub path: String,
    pub static_routes: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        let routes = [
            "",
            "/products",
            "/products/adapt-ai",
            "/products/perfecxion-red-t",
            "/products/perfecxion-agent",
            "/products/safeai-guard",
            "/products/perfecxion-comply",
            "/products/perfecxion-g-rails",
            "/products/promptshield",
            "/products/torscan",
            "/blog",
            "/learn",
            "/docs",
            "/about",
            "/contact",
            "/privacy",
            "/terms",
        ];
        Self {
            path: "sitemap.xml".to_string(),
            static_routes: routes.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.author, "perfecXion Security Team");
        assert_eq!(config.feed.limit, 20);
        assert_eq!(config.related_limit, 4);
        assert_eq!(config.content_roots.len(), 3);
        assert_eq!(
            config.root_for(ContentType::Whitepaper).map(|r| r.dir.as_str()),
            Some("content/white-papers")
        );
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Test Hub
url: https://example.com
content_roots:
  - dir: posts
    type: blog
feed:
  limit: 5
unknown_key: tolerated
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Test Hub");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.content_roots, vec![ContentRoot::new("posts", ContentType::Blog)]);
        assert_eq!(config.feed.limit, 5);
        assert_eq!(config.feed.path, "rss.xml");
        assert!(config.root_for(ContentType::Learning).is_none());
        assert!(config.extra.contains_key("unknown_key"));
    }
}
