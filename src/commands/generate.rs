//! Generate the feed, sitemap and search index

use anyhow::Result;
use chrono::Utc;

use crate::generator::Generator;
use crate::Site;

pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let index = site.load_index();
    tracing::info!(
        "Loaded {} items ({} skipped)",
        index.len(),
        index.failures().len()
    );

    let files = Generator::new(site).generate(&index, Utc::now())?;
    tracing::debug!("Wrote {:?}", files);

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_from_disk() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(blog.join("a.mdx"), "---\ntitle: A\ndate: 2024-01-01\n---\nBody\n").unwrap();
        fs::write(blog.join("broken.mdx"), "---\ntitle: \"open\n---\nBody\n").unwrap();

        let site = Site::new(tmp.path()).unwrap();
        site.generate().unwrap();

        let rss = fs::read_to_string(site.public_dir.join("rss.xml")).unwrap();
        assert!(rss.contains("/blog/a"));
        assert!(site.public_dir.join("sitemap.xml").exists());
        assert!(site.public_dir.join("search.json").exists());
    }
}
