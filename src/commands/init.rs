//! Initialize a new content site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Site;

const CONFIG_TEMPLATE: &str = r#"# perfecXion knowledge hub configuration

# Site
title: PerfecXion AI Knowledge Hub
description: The definitive source for AI infrastructure and security knowledge - articles, white papers, and learning paths.
author: perfecXion Security Team
language: en-US

# URL
url: https://perfecxion.ai

# Directory
public_dir: public
content_roots:
  - dir: content/blog
    type: blog
  - dir: content/white-papers
    type: whitepaper
  - dir: content/learning
    type: learning

# Content defaults
default_category: uncategorized
new_days: 30
related_limit: 4

# Exports
feed:
  path: rss.xml
  limit: 20
sitemap:
  path: sitemap.xml
search_index: search.json
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
    }

    let site = Site::new(target_dir)?;
    let loader = site.loader();
    for root in &site.config.content_roots {
        fs::create_dir_all(loader.root_dir(root))?;
    }

    // Create a sample post
    if let Some(root) = site.config.root_for(crate::content::ContentType::Blog) {
        let sample_path = loader.root_dir(root).join("hello-world.mdx");
        if !sample_path.exists() {
            let now = chrono::Utc::now();
            let sample_post = format!(
                r#"---
title: Hello World
description: Your first article in the knowledge hub.
date: {}
category: security
tags: [getting-started]
difficulty: beginner
---

Welcome! This article lives in `content/blog`. Create another with:

```bash
$ perfecxion-rs new blog "My New Article"
```

Then build the feed, sitemap and search index:

```bash
$ perfecxion-rs generate
```
"#,
                now.format("%Y-%m-%d")
            );
            fs::write(sample_path, sample_post)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_site() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("hub");
        init_site(&target).unwrap();

        assert!(target.join("content/white-papers").is_dir());
        assert!(target.join("content/learning").is_dir());

        let site = Site::new(&target).unwrap();
        let index = site.load_index();
        assert_eq!(index.len(), 1);
        assert!(index.failures().is_empty());
        assert_eq!(index.items()[0].slug, "hello-world");
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("_config.yml"), "title: Mine\n").unwrap();
        init_site(tmp.path()).unwrap();
        let content = fs::read_to_string(tmp.path().join("_config.yml")).unwrap();
        assert_eq!(content, "title: Mine\n");
    }
}
