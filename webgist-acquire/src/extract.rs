//! HTML extraction: title, visible body text and canonical URL.
//!
//! Extraction never fails: markup that cannot be made sense of yields
//! empty strings for the affected fields.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Elements whose content is never visible text.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// The structured record extracted from one HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// `<title>` text, trimmed. Empty if absent.
    pub title: String,
    /// Visible text of `<body>`, trimmed at both ends.
    pub content: String,
    /// `href` of `link[rel=canonical]`. Empty if absent.
    pub url: String,
}

/// Extract title, visible text and canonical URL from raw HTML.
///
/// Whitespace inside the text is left as the document has it; only the
/// ends are trimmed.
pub fn extract(html: &str) -> ExtractedPage {
    let visible = strip_invisible_tags(html);
    let document = Html::parse_document(&visible);

    ExtractedPage {
        title: extract_title(&document),
        content: extract_body_text(&document),
        url: extract_canonical(&document),
    }
}

/// Extract the page title from the first `<title>` element.
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .trim()
        .to_owned()
}

/// Text of every node under `<body>`, joined with single spaces.
fn extract_body_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|body| body.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
        .trim()
        .to_owned()
}

/// The canonical link, if the document declares one.
fn extract_canonical(document: &Html) -> String {
    let Ok(selector) = Selector::parse(r#"link[rel~="canonical"][href]"#) else {
        return String::new();
    };
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .unwrap_or_default()
        .to_owned()
}

/// Remove invisible elements and their content before parsing.
fn strip_invisible_tags(html: &str) -> String {
    let mut result = html.to_owned();
    for tag in INVISIBLE_TAGS {
        result = strip_tag(&result, tag);
    }
    result
}

/// Remove all instances of a specific HTML tag and its content.
///
/// Matching is ASCII case-insensitive, so byte offsets found in the
/// lowered copy are valid in the original.
fn strip_tag(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let lower = html.to_ascii_lowercase();
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");

    let mut pos = 0;
    loop {
        let start = match lower[pos..].find(&open_tag) {
            Some(offset) => pos + offset,
            None => {
                result.push_str(&html[pos..]);
                break;
            }
        };

        // Reject longer tag names sharing the prefix (<scripts>, <styled>).
        let after_tag = start + open_tag.len();
        if after_tag < lower.len() {
            let next_byte = lower.as_bytes()[after_tag];
            if !matches!(next_byte, b' ' | b'>' | b'/' | b'\n' | b'\r' | b'\t') {
                result.push_str(&html[pos..after_tag]);
                pos = after_tag;
                continue;
            }
        }

        result.push_str(&html[pos..start]);

        let end = match lower[start..].find(&close_tag) {
            Some(offset) => start + offset + close_tag.len(),
            None => match lower[start..].find('>') {
                Some(offset) => start + offset + 1,
                None => html.len(),
            },
        };

        pos = end;
    }

    result
}
