//! perfecxion-rs: content index, search, feeds and HTTP API for the
//! perfecXion knowledge hub
//!
//! Markdown/MDX documents with YAML front-matter are loaded from the
//! configured content roots into an immutable [`index::ContentIndex`]. The
//! index answers lookups, search and relatedness queries, feeds the RSS,
//! sitemap and search JSON generators, and backs the HTTP API.

pub mod commands;
pub mod config;
pub mod consent;
pub mod content;
pub mod error;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod index;
pub mod newsletter;
pub mod server;

use std::path::{Path, PathBuf};

use content::ContentLoader;
use index::ContentIndex;

/// A site rooted at a directory holding `_config.yml`
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open the site in `base_dir`, falling back to defaults without `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> error::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Loader over this site's content roots
    pub fn loader(&self) -> ContentLoader<'_> {
        ContentLoader::new(&self.config, &self.base_dir)
    }

    /// Load every content root into a fresh index
    pub fn load_index(&self) -> ContentIndex {
        ContentIndex::build(&self.loader())
    }

    /// Write the feed, sitemap and search index
    pub fn generate(&self) -> anyhow::Result<()> {
        commands::generate::run(self)
    }

    /// Remove the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}
