//! Data-quality gate over every content root

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::content::{ContentType, LoadFailure};
use crate::index::ContentIndex;
use crate::Site;

/// Several documents of one type resolving to the same slug
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateSlug {
    pub content_type: ContentType,
    pub slug: String,
    pub sources: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    pub failures: Vec<LoadFailure>,
    pub duplicates: Vec<DuplicateSlug>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.duplicates.is_empty()
    }
}

pub fn inspect(index: &ContentIndex) -> CheckReport {
    let mut by_slug: BTreeMap<(ContentType, &str), Vec<PathBuf>> = BTreeMap::new();
    for item in index.items() {
        by_slug
            .entry((item.content_type, item.slug.as_str()))
            .or_default()
            .push(item.source.clone());
    }

    let duplicates = by_slug
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|((content_type, slug), mut sources)| {
            sources.sort();
            DuplicateSlug {
                content_type,
                slug: slug.to_string(),
                sources,
            }
        })
        .collect();

    CheckReport {
        checked: index.len() + index.failures().len(),
        failures: index.failures().to_vec(),
        duplicates,
    }
}

/// Load everything and fail when any document is rejected or ambiguous
pub fn run(site: &Site) -> Result<()> {
    let report = inspect(&site.load_index());

    for failure in &report.failures {
        println!("✗ {}: {}", failure.path.display(), failure.message);
    }
    for duplicate in &report.duplicates {
        println!(
            "✗ duplicate {} slug {:?}: {}",
            duplicate.content_type,
            duplicate.slug,
            duplicate
                .sources
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} of {} documents failed, {} duplicate slugs",
            report.failures.len(),
            report.checked,
            report.duplicates.len()
        );
    }

    println!("✓ {} documents OK", report.checked);
    Ok(())
}
