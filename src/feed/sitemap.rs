//! Sitemap XML

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::{ContentItem, ContentType};
use crate::helpers::{date_w3c, escape_xml, full_url_for};

struct Entry {
    loc: String,
    lastmod: String,
    changefreq: &'static str,
    priority: &'static str,
}

/// Priority of a content page in the sitemap
pub fn content_priority(item: &ContentItem) -> &'static str {
    if item.featured {
        return "0.9";
    }
    match item.content_type {
        ContentType::Whitepaper | ContentType::Learning => "0.7",
        ContentType::Blog => "0.6",
    }
}

/// Render the sitemap: configured static routes first, then every item
pub fn render_sitemap(
    config: &SiteConfig,
    items: &[ContentItem],
    generated_at: DateTime<Utc>,
) -> String {
    let generated = date_w3c(&generated_at);

    let statics = config.sitemap.static_routes.iter().map(|route| Entry {
        loc: full_url_for(config, route),
        lastmod: generated.clone(),
        changefreq: if route.is_empty() || route == "/" { "daily" } else { "weekly" },
        priority: if route.is_empty() || route == "/" { "1.0" } else { "0.8" },
    });

    let pages = items.iter().map(|item| Entry {
        loc: full_url_for(config, &item.href),
        lastmod: item
            .last_modified()
            .map(|d| date_w3c(&d))
            .unwrap_or_else(|| generated.clone()),
        changefreq: "monthly",
        priority: content_priority(item),
    });

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in statics.chain(pages) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq));
        xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    /// The `<url>` block whose `<loc>` is exactly `loc`
    fn entry_for<'a>(xml: &'a str, loc: &str) -> &'a str {
        let needle = format!("<loc>{}</loc>", loc);
        xml.split("<url>")
            .find(|chunk| chunk.contains(&needle))
            .unwrap_or_else(|| panic!("no entry for {}", loc))
    }

    #[test]
    fn test_static_routes() {
        let config = SiteConfig::default();
        let xml = render_sitemap(&config, &[], generated_at());
        assert_eq!(xml.matches("<url>").count(), config.sitemap.static_routes.len());

        let home = entry_for(&xml, "https://perfecxion.ai");
        assert!(home.contains("<changefreq>daily</changefreq>"));
        assert!(home.contains("<priority>1.0</priority>"));
        assert!(home.contains("<lastmod>2024-06-01T00:00:00Z</lastmod>"));

        let about = entry_for(&xml, "https://perfecxion.ai/about");
        assert!(about.contains("<changefreq>weekly</changefreq>"));
        assert!(about.contains("<priority>0.8</priority>"));
    }

    #[test]
    fn test_content_entries() {
        let config = SiteConfig {
            sitemap: crate::config::SitemapConfig {
                static_routes: Vec::new(),
                ..Default::default()
            },
            ..Default::default()
        };

        let mut blog = ContentItem::new(ContentType::Blog, "post", "Post");
        blog.date = Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        blog.updated = Some(Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap());
        let mut paper = ContentItem::new(ContentType::Whitepaper, "paper", "Paper");
        paper.date = Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap());
        let mut featured = ContentItem::new(ContentType::Learning, "path", "Path");
        featured.featured = true;

        let xml = render_sitemap(&config, &[blog, paper, featured], generated_at());
        assert_eq!(xml.matches("<url>").count(), 3);

        let blog = entry_for(&xml, "https://perfecxion.ai/blog/post");
        assert!(blog.contains("<lastmod>2024-02-20T00:00:00Z</lastmod>"));
        assert!(blog.contains("<priority>0.6</priority>"));
        assert!(blog.contains("<changefreq>monthly</changefreq>"));

        let paper = entry_for(&xml, "https://perfecxion.ai/white-papers/paper");
        assert!(paper.contains("<lastmod>2024-03-05T00:00:00Z</lastmod>"));
        assert!(paper.contains("<priority>0.7</priority>"));

        let featured = entry_for(&xml, "https://perfecxion.ai/learn/path");
        assert!(featured.contains("<lastmod>2024-06-01T00:00:00Z</lastmod>"));
        assert!(featured.contains("<priority>0.9</priority>"));
    }
}
