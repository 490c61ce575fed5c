//! Plain-text helpers: excerpts, word counts, reading time

use lazy_static::lazy_static;
use regex::Regex;

/// Words per minute used for reading time estimates
pub const WORDS_PER_MINUTE: usize = 200;

/// Default excerpt length in characters
pub const EXCERPT_LENGTH: usize = 160;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?m)^#{1,6}\s+").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"[*_`~]").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Reduce markdown to a single line of plain text
pub fn strip_markdown(markdown: &str) -> String {
    let text = HEADING.replace_all(markdown, "");
    let text = LINK.replace_all(&text, "$1");
    let text = EMPHASIS.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Plain-text excerpt of at most `max_chars` characters, `...` appended when cut
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let plain = strip_markdown(markdown);
    if plain.chars().count() <= max_chars {
        return plain;
    }
    let cut: String = plain.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Count words, treating each CJK ideograph as a word
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphanumeric() && !is_cjk(c) {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else if is_cjk(c) {
            count += 1;
            in_word = false;
        } else if c == '\'' || c == '-' {
            // contractions and compounds stay one word
        } else {
            in_word = false;
        }
    }

    count
}

fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Estimated reading time in whole minutes, never less than one
pub fn reading_minutes(markdown: &str) -> usize {
    let words = count_words(&strip_markdown(markdown));
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Human title derived from a slug: `zero-trust_ai` -> `Zero Trust Ai`
pub fn title_from_slug(slug: &str) -> String {
    let words: Vec<String> = slug
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "Untitled".to_string()
    } else {
        words.join(" ")
    }
}
