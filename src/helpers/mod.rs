//! Helper functions shared by the loader, feeds and server
//!
//! Date parsing and formatting, URL building, XML escaping and
//! plain-text utilities for excerpts and reading time.

mod date;
mod text;
mod url;
mod xml;

pub use date::*;
pub use text::*;
pub use url::*;
pub use xml::*;
