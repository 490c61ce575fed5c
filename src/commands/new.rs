//! Create a new content document

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::ContentType;
use crate::Site;

/// Create `{root}/{slug}.mdx` for the given type and return its path
pub fn create_item(site: &Site, content_type: ContentType, title: &str) -> Result<PathBuf> {
    let Some(root) = site.config.root_for(content_type) else {
        anyhow::bail!("No content root configured for type {}", content_type);
    };

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    let target_dir = site.loader().root_dir(root);
    fs::create_dir_all(&target_dir)?;
    let file_path = target_dir.join(format!("{}.mdx", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Utc::now();
    let content = format!(
        "---\ntitle: {}\ndescription: ''\ndate: {}\ncategory: {}\ntags: []\ndifficulty: intermediate\nformat: {}\n---\n",
        serde_json::to_string(title)?,
        now.format("%Y-%m-%d"),
        site.config.default_category,
        content_type.default_format()
    );

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, content_type: &str, title: &str) -> Result<()> {
    let content_type: ContentType = content_type.parse().map_err(anyhow::Error::msg)?;
    create_item(site, content_type, title)?;
    Ok(())
}
