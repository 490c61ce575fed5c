//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode one path segment (a slug)
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/post") // -> "https://perfecxion.ai/blog/post"
/// full_url_for(&config, "")           // -> "https://perfecxion.ai"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_url_for() {
        let config = config();
        assert_eq!(full_url_for(&config, "/blog/a"), "https://example.com/blog/a");
        assert_eq!(full_url_for(&config, "learn"), "https://example.com/learn");
        assert_eq!(full_url_for(&config, ""), "https://example.com");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("plain-slug"), "plain-slug");
        assert_eq!(encode_segment("with space"), "with%20space");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }
}
