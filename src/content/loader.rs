//! Content loader - loads documents from the configured content roots

use lazy_static::lazy_static;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter::ReadTime;
use super::{ContentItem, ContentType, Domain, FrontMatter};
use crate::config::{ContentRoot, SiteConfig};
use crate::error::{Result, SiteError};
use crate::helpers::{excerpt, reading_minutes, title_from_slug, EXCERPT_LENGTH};

/// Maximum number of topics kept per item
const MAX_TOPICS: usize = 5;

lazy_static! {
    /// Technology mentions promoted to topics when front-matter lists none
    static ref TOPIC_KEYWORDS: Vec<(&'static [&'static str], &'static str)> = vec![
        (&["rocev2", "roce"][..], "RoCEv2"),
        (&["infiniband"][..], "InfiniBand"),
        (&["llm"][..], "LLM Training"),
        (&["prompt injection"][..], "Prompt Injection"),
        (&["neural network"][..], "Neural Networks"),
        (&["gpu"][..], "GPU Clusters"),
        (&["400g"][..], "400G Networking"),
        (&["800g"][..], "800G Networking"),
        (&["hipaa"][..], "HIPAA Compliance"),
        (&["distributed"][..], "Distributed Training"),
        (&["ai fabric"][..], "AI Fabric"),
        (&["zero trust"][..], "Zero Trust"),
        (&["model security"][..], "Model Security"),
        (&["rdma"][..], "RDMA"),
        (&["networking"][..], "Networking"),
    ];
}

/// A document that could not be turned into a [`ContentItem`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Everything recovered from one or more content roots
#[derive(Debug, Default)]
pub struct LoadReport {
    pub items: Vec<ContentItem>,
    pub failures: Vec<LoadFailure>,
    /// Documents skipped because they are marked `draft: true`
    pub drafts: usize,
}

impl LoadReport {
    pub fn extend(&mut self, other: LoadReport) {
        self.items.extend(other.items);
        self.failures.extend(other.failures);
        self.drafts += other.drafts;
    }
}

/// Loads content from the configured content roots
pub struct ContentLoader<'a> {
    config: &'a SiteConfig,
    base_dir: &'a Path,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader; relative roots resolve against `base_dir`
    pub fn new(config: &'a SiteConfig, base_dir: &'a Path) -> Self {
        Self { config, base_dir }
    }

    /// Absolute directory of a content root
    pub fn root_dir(&self, root: &ContentRoot) -> PathBuf {
        let dir = Path::new(&root.dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.base_dir.join(dir)
        }
    }

    /// Load every configured root, concatenating in configuration order
    pub fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();
        for root in &self.config.content_roots {
            report.extend(self.load_root(root));
        }
        report
    }

    /// Load all markdown documents under one root
    pub fn load_root(&self, root: &ContentRoot) -> LoadReport {
        let root_dir = self.root_dir(root);
        let mut report = LoadReport::default();

        if !root_dir.is_dir() {
            tracing::debug!("Content root {:?} does not exist, skipping", root_dir);
            return report;
        }

        for entry in WalkDir::new(&root_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_file(path, &root_dir, root.content_type) {
                Ok(Some(item)) => report.items.push(item),
                Ok(None) => {
                    tracing::debug!("Skipping draft {:?}", path);
                    report.drafts += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    report.failures.push(LoadFailure {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            "Loaded {} {} items from {:?} ({} failed)",
            report.items.len(),
            root.content_type,
            root_dir,
            report.failures.len()
        );

        report
    }

    /// Load a single document; `Ok(None)` for drafts
    pub fn load_file(
        &self,
        path: &Path,
        root_dir: &Path,
        content_type: ContentType,
    ) -> Result<Option<ContentItem>> {
        let raw = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&raw).map_err(|e| SiteError::parse(path, e))?;

        if fm.draft {
            return Ok(None);
        }

        let date = fm.parse_date().map_err(|e| SiteError::parse(path, e))?;
        let updated = fm.parse_updated().map_err(|e| SiteError::parse(path, e))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let source = path.strip_prefix(root_dir).unwrap_or(path).to_path_buf();
        let relative_dir = source
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        let title = non_empty(fm.title.as_deref()).unwrap_or_else(|| title_from_slug(&slug));

        let description = non_empty(fm.description.as_deref())
            .or_else(|| non_empty(fm.excerpt.as_deref()))
            .unwrap_or_else(|| excerpt(body, EXCERPT_LENGTH));

        let author = fm
            .author
            .as_ref()
            .and_then(|a| non_empty(Some(a.name())))
            .unwrap_or_else(|| self.config.author.clone());

        let (category, domain) = match non_empty(fm.category.as_deref()) {
            Some(category) => {
                let domain = Domain::from_category(&category);
                (category, domain)
            }
            None => (
                self.config.default_category.clone(),
                Domain::from_path(&relative_dir),
            ),
        };

        let tags: BTreeSet<String> = fm
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let topics = if fm.topics.is_empty() {
            detect_topics(&title, &description)
        } else {
            dedup_topics(fm.topics.iter().map(|t| t.trim().to_string()))
        };

        let format = fm
            .format
            .or_else(|| fm.kind.as_deref().map(super::Format::from_type_label))
            .unwrap_or_else(|| content_type.default_format());

        let read_time = match (&fm.read_time, fm.reading_time) {
            (Some(ReadTime::Text(text)), _) if !text.trim().is_empty() => text.trim().to_string(),
            (Some(ReadTime::Minutes(minutes)), _) => format!("{} min read", minutes),
            (Some(ReadTime::Fractional(minutes)), _) if *minutes > 0.0 => {
                format!("{} min read", minutes.ceil() as u64)
            }
            (_, Some(minutes)) if minutes > 0.0 => format!("{} min read", minutes.ceil() as u64),
            _ => format!("{} min read", reading_minutes(body)),
        };

        let mut item = ContentItem::new(content_type, slug, title);
        item.description = description;
        item.date = date;
        item.updated = updated;
        item.author = author;
        item.category = category;
        item.domain = domain;
        item.topics = topics;
        item.tags = tags;
        item.format = format;
        item.difficulty = fm.difficulty.unwrap_or_default();
        item.read_time = read_time;
        item.featured = fm.featured;
        item.body = body.to_string();
        item.source = source;

        Ok(Some(item))
    }
}

/// Check if a file is a markdown or MDX file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "mdx")
        .unwrap_or(false)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn dedup_topics(topics: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    topics
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .take(MAX_TOPICS)
        .collect()
}

/// Derive topics from technology mentions in the title and description
pub fn detect_topics(title: &str, description: &str) -> Vec<String> {
    let text = format!("{} {}", title, description).to_lowercase();
    dedup_topics(
        TOPIC_KEYWORDS
            .iter()
            .filter(|(needles, _)| needles.iter().any(|n| text.contains(n)))
            .map(|(_, label)| label.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Difficulty, Format};
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn blog_config() -> SiteConfig {
        SiteConfig {
            content_roots: vec![ContentRoot::new("blog", ContentType::Blog)],
            ..Default::default()
        }
    }

    #[test]
    fn test_loads_valid_and_skips_malformed() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("blog");
        write(&blog, "first.mdx", "---\ntitle: First\ndate: 2024-01-01\n---\nBody one");
        write(&blog, "second.md", "---\ntitle: Second\n---\nBody two");
        write(&blog, "broken.mdx", "---\ntitle: \"Unbalanced\ntags: [a\n---\nBody");
        write(&blog, "notes.txt", "not markdown");

        let config = blog_config();
        let report = ContentLoader::new(&config, tmp.path()).load_all();

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("broken.mdx"));

        let mut slugs: Vec<_> = report.items.iter().map(|i| i.slug.as_str()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["first", "second"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let config = blog_config();
        let report = ContentLoader::new(&config, tmp.path()).load_all();
        assert!(report.items.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_defaults_applied() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("blog");
        write(&blog, "zero-trust-for-llm.md", "Plain body without metadata.");

        let config = blog_config();
        let report = ContentLoader::new(&config, tmp.path()).load_all();
        let item = &report.items[0];

        assert_eq!(item.title, "Zero Trust For Llm");
        assert_eq!(item.description, "Plain body without metadata.");
        assert_eq!(item.author, "perfecXion Security Team");
        assert_eq!(item.category, "uncategorized");
        assert_eq!(item.difficulty, Difficulty::Intermediate);
        assert_eq!(item.format, Format::Article);
        assert_eq!(item.read_time, "1 min read");
        assert_eq!(item.href, "/blog/zero-trust-for-llm");
        assert!(item.date.is_none());
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_fields_mapped_from_frontmatter() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("papers");
        write(
            &root,
            "nested/gpu-fabric.mdx",
            r#"---
title: GPU Fabric Security
description: Securing RDMA networking for GPU clusters
date: 2024-05-01
author:
  name: Network Team
category: infrastructure
tags: [rdma, gpu, rdma]
type: reference
difficulty: advanced
readingTime: 14.2
featured: true
---
Body"#,
        );

        let config = SiteConfig {
            content_roots: vec![ContentRoot::new("papers", ContentType::Whitepaper)],
            ..Default::default()
        };
        let report = ContentLoader::new(&config, tmp.path()).load_all();
        let item = &report.items[0];

        assert_eq!(item.content_type, ContentType::Whitepaper);
        assert_eq!(item.href, "/white-papers/gpu-fabric");
        assert_eq!(item.author, "Network Team");
        assert_eq!(item.domain, Domain::Infrastructure);
        assert_eq!(item.format, Format::Architecture);
        assert_eq!(item.difficulty, Difficulty::Advanced);
        assert_eq!(item.read_time, "15 min read");
        assert_eq!(item.tags.len(), 2);
        assert!(item.featured);
        assert_eq!(item.source, PathBuf::from("nested/gpu-fabric.mdx"));
        assert_eq!(
            item.topics,
            vec!["GPU Clusters", "RDMA", "Networking"]
        );
    }

    #[test]
    fn test_drafts_skipped_without_failure() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("blog");
        write(&blog, "wip.md", "---\ntitle: WIP\ndraft: true\n---\n");

        let config = blog_config();
        let report = ContentLoader::new(&config, tmp.path()).load_all();
        assert!(report.items.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.drafts, 1);
    }

    #[test]
    fn test_explicit_topics_win_and_dedup() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("blog");
        write(
            &blog,
            "t.md",
            "---\ntitle: LLM notes\ntopics: [B, A, B]\nreadTime: 7\n---\n",
        );

        let config = blog_config();
        let report = ContentLoader::new(&config, tmp.path()).load_all();
        assert_eq!(report.items[0].topics, vec!["B", "A"]);
        assert_eq!(report.items[0].read_time, "7 min read");
    }

    #[test]
    fn test_fractional_read_time_rounds_up() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("blog");
        write(&blog, "a.md", "---\ntitle: A\nreadTime: 7.5\ntags: 2024\n---\n");
        write(&blog, "b.md", "---\ntitle: B\nreadTime: -2.0\n---\nshort body");

        let config = blog_config();
        let mut report = ContentLoader::new(&config, tmp.path()).load_all();
        report.items.sort_by(|a, b| a.slug.cmp(&b.slug));
        assert_eq!(report.items[0].read_time, "8 min read");
        assert!(report.items[0].tags.contains("2024"));
        assert_eq!(report.items[1].read_time, "1 min read");
    }

    #[test]
    fn test_detect_topics_caps_at_five() {
        let topics = detect_topics(
            "RoCE and InfiniBand for LLM GPU clusters",
            "400G and 800G networking with RDMA",
        );
        assert_eq!(topics.len(), MAX_TOPICS);
        assert_eq!(topics[0], "RoCEv2");
    }
}
