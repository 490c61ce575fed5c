//! Content module - the document model, front-matter schema, loader and renderer

mod frontmatter;
mod item;
pub mod loader;
mod markdown;

pub use frontmatter::{Author, FrontMatter, FrontMatterError, ReadTime};
pub use item::{ContentItem, ContentType, Difficulty, Domain, Format, ItemView};
pub use loader::{ContentLoader, LoadFailure, LoadReport};
pub use markdown::{preprocess_mdx, MarkdownRenderer};
