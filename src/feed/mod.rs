//! Feed and export generators - RSS 2.0 and sitemap XML

mod rss;
mod sitemap;

pub use rss::{feed_items, render_rss};
pub use sitemap::{content_priority, render_sitemap};
