//! List site content

use anyhow::Result;

use crate::content::{ContentItem, ContentType};
use crate::helpers::short_date;
use crate::index::{newest_first, ContentIndex};
use crate::Site;

fn item_line(item: &ContentItem) -> String {
    let date = item
        .date
        .as_ref()
        .map(short_date)
        .unwrap_or_else(|| "----------".to_string());
    format!("  {} - {} [{}]", date, item.title, item.href)
}

/// Render the listing for `what`
pub fn render(index: &ContentIndex, what: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match what {
        "all" => {
            let mut items: Vec<&ContentItem> = index.items().iter().collect();
            items.sort_by(|a, b| newest_first(a, b));
            lines.push(format!("Content ({}):", items.len()));
            lines.extend(items.into_iter().map(item_line));
        }
        "tag" | "tags" => {
            let tags = index.tags();
            lines.push(format!("Tags ({}):", tags.len()));
            lines.extend(tags.iter().map(|t| format!("  {} ({})", t.name, t.count)));
        }
        "category" | "categories" => {
            let categories = index.categories();
            lines.push(format!("Categories ({}):", categories.len()));
            lines.extend(
                categories
                    .iter()
                    .map(|c| format!("  {} ({})", c.name, c.count)),
            );
        }
        "stats" => {
            let stats = index.stats();
            lines.push(format!("Total: {}", stats.total));
            for (label, counts) in [
                ("By type", &stats.by_type),
                ("By category", &stats.by_category),
                ("By difficulty", &stats.by_difficulty),
            ] {
                lines.push(format!("{}:", label));
                lines.extend(counts.iter().map(|(k, v)| format!("  {} ({})", k, v)));
            }
        }
        other => {
            let Ok(content_type) = other.parse::<ContentType>() else {
                anyhow::bail!(
                    "Unknown type: {}. Available: blog, whitepaper, learning, all, tags, categories, stats",
                    other
                );
            };
            let mut items = index.get_content_by_type(content_type);
            items.sort_by(|a, b| newest_first(a, b));
            lines.push(format!("{} ({}):", content_type, items.len()));
            lines.extend(items.into_iter().map(item_line));
        }
    }

    Ok(lines)
}

/// List site content by type
pub fn run(site: &Site, what: &str) -> Result<()> {
    let index = site.load_index();
    for line in render(&index, what)? {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::fixtures::item;

    fn sample() -> ContentIndex {
        ContentIndex::from_items(vec![
            item(ContentType::Blog, "old", Some((2023, 5, 1)), "security", &["llm"]),
            item(ContentType::Blog, "new", Some((2024, 5, 1)), "security", &["llm", "rag"]),
            item(ContentType::Learning, "course", None, "basics", &[]),
        ])
    }

    #[test]
    fn test_list_type_newest_first() {
        let lines = render(&sample(), "blog").unwrap();
        assert_eq!(lines[0], "blog (2):");
        assert_eq!(lines[1], "  2024-05-01 - new [/blog/new]");
        assert_eq!(lines[2], "  2023-05-01 - old [/blog/old]");
    }

    #[test]
    fn test_list_all_undated_last() {
        let lines = render(&sample(), "all").unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "  ---------- - course [/learn/course]");
    }

    #[test]
    fn test_list_tags() {
        let lines = render(&sample(), "tags").unwrap();
        assert_eq!(lines, vec!["Tags (2):", "  llm (2)", "  rag (1)"]);
    }

    #[test]
    fn test_list_unknown() {
        assert!(render(&sample(), "podcasts").is_err());
    }
}
