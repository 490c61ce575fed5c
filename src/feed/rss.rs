//! RSS 2.0 feed

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::ContentItem;
use crate::helpers::{date_rfc2822, escape_xml, full_url_for, strip_invalid_xml_chars};
use crate::index::newest_first;

/// Escape text for an XML text node or attribute
fn text(s: &str) -> String {
    escape_xml(&strip_invalid_xml_chars(s))
}

/// Dated items, newest first, capped at the configured feed size
pub fn feed_items<'a>(config: &SiteConfig, items: &'a [ContentItem]) -> Vec<&'a ContentItem> {
    let mut dated: Vec<&ContentItem> = items.iter().filter(|i| i.date.is_some()).collect();
    dated.sort_by(|a, b| newest_first(a, b));
    dated.truncate(config.feed.limit);
    dated
}

/// Render the RSS document for the given items
pub fn render_rss(config: &SiteConfig, items: &[ContentItem], now: DateTime<Utc>) -> String {
    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:dc="http://purl.org/dc/elements/1.1/">"#);
    feed.push('\n');
    feed.push_str("  <channel>\n");
    feed.push_str(&format!("    <title>{}</title>\n", text(&config.title)));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        text(&config.description)
    ));
    feed.push_str(&format!("    <link>{}</link>\n", text(&full_url_for(config, ""))));
    feed.push_str(&format!("    <language>{}</language>\n", text(&config.language)));
    feed.push_str(&format!(
        "    <lastBuildDate>{}</lastBuildDate>\n",
        date_rfc2822(&now)
    ));
    feed.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        text(&full_url_for(config, "/api/rss"))
    ));

    for item in feed_items(config, items) {
        let link = text(&full_url_for(config, &item.href));

        feed.push_str("    <item>\n");
        feed.push_str(&format!("      <title>{}</title>\n", text(&item.title)));
        feed.push_str(&format!(
            "      <description>{}</description>\n",
            text(&item.description)
        ));
        feed.push_str(&format!("      <link>{}</link>\n", link));
        feed.push_str(&format!("      <guid isPermaLink=\"true\">{}</guid>\n", link));
        if let Some(date) = &item.date {
            feed.push_str(&format!("      <pubDate>{}</pubDate>\n", date_rfc2822(date)));
        }
        if !item.author.is_empty() {
            feed.push_str(&format!(
                "      <dc:creator>{}</dc:creator>\n",
                text(&item.author)
            ));
        }
        feed.push_str(&format!("      <category>{}</category>\n", item.domain));
        feed.push_str(&format!("      <category>{}</category>\n", item.format));
        for topic in &item.topics {
            feed.push_str(&format!("      <category>{}</category>\n", text(topic)));
        }
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");
    feed
}
