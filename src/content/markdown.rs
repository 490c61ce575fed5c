//! Markdown rendering with syntax highlighting
//!
//! MDX bodies are reduced to plain markdown first: the handful of custom
//! components the blog uses are turned into styled HTML and any other JSX
//! component is removed, since no JSX runtime is available here.

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

lazy_static! {
    static ref ALERT_BOX: Regex = Regex::new(
        r#"<AlertBox[^>]*type="([^"]*)"[^>]*title="([^"]*)"[^>]*>([\s\S]*?)</AlertBox>"#
    )
    .unwrap();
    static ref SECTION_HEADER: Regex = Regex::new(
        r#"<SectionHeader[^>]*title="([^"]*)"[^>]*subtitle="([^"]*)"[^>]*/>"#
    )
    .unwrap();
    static ref COMPARISON_TABLE: Regex = Regex::new(
        r#"<ComparisonTable[^>]*headers=\{(\[[^\]]*\])\}[^>]*rows=\{(\[[\s\S]*?\]\s*\])\}\s*/>"#
    )
    .unwrap();
    static ref SELF_CLOSING_COMPONENT: Regex = Regex::new(r"<[A-Z][a-zA-Z]*[^>]*/>").unwrap();
    static ref BLOCK_COMPONENT: Regex =
        Regex::new(r"<[A-Z][a-zA-Z]*[^>]*>[\s\S]*?</[A-Z][a-zA-Z]*>").unwrap();
}

const CELL_STYLE: &str = "border: 1px solid #d1d5db; padding: 0.5rem; text-align: left;";

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        html_output
    }

    /// Render an MDX body: known components become HTML, the rest is dropped
    pub fn render_mdx(&self, mdx: &str) -> String {
        self.render(&preprocess_mdx(mdx))
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                lang, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang,
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert the blog's custom MDX components into HTML, dropping the rest
pub fn preprocess_mdx(content: &str) -> String {
    let content = ALERT_BOX.replace_all(content, |caps: &Captures| {
        let (color, background) = if &caps[1] == "danger" {
            ("#dc2626", "#fee2e2")
        } else {
            ("#3b82f6", "#dbeafe")
        };
        format!(
            r#"<div style="padding: 1.5rem; margin: 2rem 0; border-radius: 8px; border-left: 4px solid {color}; background-color: {background};"><p style="font-weight: 600; color: {color}; margin-bottom: 0.5rem;">{}</p><p style="margin: 0;">{}</p></div>"#,
            &caps[2],
            caps[3].trim()
        )
    });

    let content = SECTION_HEADER.replace_all(
        &content,
        r#"<div style="margin: 2rem 0;"><h2 style="margin-bottom: 0.5rem;">$1</h2><p style="color: #6b7280; margin: 0;">$2</p></div>"#,
    );

    let content = COMPARISON_TABLE.replace_all(&content, |caps: &Captures| {
        comparison_table(&caps[1], &caps[2]).unwrap_or_default()
    });

    let content = SELF_CLOSING_COMPONENT.replace_all(&content, "");
    BLOCK_COMPONENT.replace_all(&content, "").into_owned()
}

/// Build a table from JSON-compatible `headers`/`rows` props
fn comparison_table(headers: &str, rows: &str) -> Option<String> {
    let headers: Vec<String> = serde_json::from_str(headers).ok()?;
    let rows: Vec<Vec<String>> = serde_json::from_str(rows).ok()?;

    let header_html: String = headers
        .iter()
        .map(|h| format!(r#"<th style="{}">{}</th>"#, CELL_STYLE, html_escape(h)))
        .collect();
    let rows_html: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|c| format!(r#"<td style="{}">{}</td>"#, CELL_STYLE, html_escape(c)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();

    Some(format!(
        r#"<table style="width: 100%; border-collapse: collapse; margin: 1rem 0;"><thead><tr style="background-color: #f3f4f6;">{}</tr></thead><tbody>{}</tbody></table>"#,
        header_html, rows_html
    ))
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
