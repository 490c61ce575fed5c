//! Show the items most related to one item

use anyhow::Result;

use crate::content::ContentType;
use crate::Site;

pub fn run(site: &Site, content_type: &str, slug: &str, limit: Option<usize>) -> Result<()> {
    let content_type: ContentType = content_type.parse().map_err(anyhow::Error::msg)?;

    let index = site.load_index();
    let source = index.require(content_type, slug)?;

    let limit = limit.unwrap_or(site.config.related_limit);
    println!("Related to {} ({}):", source.title, source.href);
    for related in index.related_to(source, limit) {
        println!(
            "  {:>2}  {} [{}]",
            related.score, related.content.title, related.content.href
        );
    }

    Ok(())
}
