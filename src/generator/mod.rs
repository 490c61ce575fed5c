//! Generator module - writes the RSS feed, sitemap and search index into the
//! public directory

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::content::{ContentItem, ContentType};
use crate::error::Result;
use crate::feed::{render_rss, render_sitemap};
use crate::helpers::short_date;
use crate::index::{newest_first, ContentIndex};
use crate::Site;

/// One entry of `search.json`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry<'a> {
    pub title: &'a str,
    pub href: &'a str,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub category: &'a str,
    pub tags: &'a BTreeSet<String>,
    pub date: Option<String>,
    pub description: &'a str,
    pub is_new: bool,
}

impl<'a> SearchEntry<'a> {
    /// Entry for `item`, flagged new when dated within `new_days` of `now`
    pub fn new(item: &'a ContentItem, now: &DateTime<Utc>, new_days: i64) -> Self {
        Self {
            title: &item.title,
            href: &item.href,
            content_type: item.content_type,
            category: &item.category,
            tags: &item.tags,
            date: item.date.as_ref().map(short_date),
            description: &item.description,
            is_new: item.is_new(now, new_days),
        }
    }
}

/// Paths written by one run
#[derive(Debug, Clone)]
pub struct GeneratedFiles {
    pub feed: PathBuf,
    pub sitemap: PathBuf,
    pub search_index: PathBuf,
}

/// Writes the static exports of a site
pub struct Generator<'a> {
    site: &'a Site,
}

impl<'a> Generator<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Generate every export from the index
    pub fn generate(&self, index: &ContentIndex, now: DateTime<Utc>) -> Result<GeneratedFiles> {
        // Ensure public directory exists
        fs::create_dir_all(&self.site.public_dir)?;

        let mut items: Vec<&ContentItem> = index.items().iter().collect();
        items.sort_by(|a, b| newest_first(a, b));

        Ok(GeneratedFiles {
            feed: self.generate_feed(index, now)?,
            sitemap: self.generate_sitemap(index, now)?,
            search_index: self.generate_search_index(&items, now)?,
        })
    }

    fn generate_feed(&self, index: &ContentIndex, now: DateTime<Utc>) -> Result<PathBuf> {
        let config = &self.site.config;
        let output_path = self.site.public_dir.join(&config.feed.path);
        fs::write(&output_path, render_rss(config, index.items(), now))?;
        tracing::info!("Generated {}", config.feed.path);
        Ok(output_path)
    }

    fn generate_sitemap(&self, index: &ContentIndex, now: DateTime<Utc>) -> Result<PathBuf> {
        let config = &self.site.config;
        let output_path = self.site.public_dir.join(&config.sitemap.path);
        fs::write(&output_path, render_sitemap(config, index.items(), now))?;
        tracing::info!("Generated {}", config.sitemap.path);
        Ok(output_path)
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, items: &[&ContentItem], now: DateTime<Utc>) -> Result<PathBuf> {
        let new_days = self.site.config.new_days;
        let entries: Vec<SearchEntry<'_>> = items
            .iter()
            .map(|item| SearchEntry::new(item, &now, new_days))
            .collect();

        let output_path = self.site.public_dir.join(&self.site.config.search_index);
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated {}", self.site.config.search_index);

        Ok(output_path)
    }
}
