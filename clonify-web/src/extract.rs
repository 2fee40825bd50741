//! Split a page's markup into inline CSS, inline JavaScript and a resource listing.
//!
//! This is a heuristic text scan, not a parser: nested or broken tag boundaries
//! are not repaired, and a `</style>` inside a string literal ends the block.
//! Nothing here fails; markup that does not match simply contributes nothing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::resources::collect_resources;

pub const NO_CSS_PLACEHOLDER: &str = "No internal CSS found";
pub const NO_JS_PLACEHOLDER: &str = "No internal JavaScript found";

/// Appended after every extracted block.
pub const BLOCK_SEPARATOR: &str = "\n\n";

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style>").expect("style regex"));
static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<script\b[^>]*>)(.*?)</script>").expect("script regex")
});
static SRC_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\ssrc\s*=").expect("src attr regex"));

/// Everything derived from one fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub html: String,
    pub css: String,
    pub js: String,
    pub resources: String,
}

/// Run all three scans over `html`.
///
/// ```
/// use clonify_web::extract::{extract, NO_JS_PLACEHOLDER};
///
/// let page = r#"<html><head><style>body { margin: 0 }</style></head><body></body></html>"#;
/// let result = extract(page);
/// assert_eq!(result.css, "body { margin: 0 }\n\n");
/// assert_eq!(result.js, NO_JS_PLACEHOLDER);
/// assert_eq!(result.html, page);
/// ```
pub fn extract(html: &str) -> ExtractionResult {
    ExtractionResult {
        html: html.to_string(),
        css: inline_css(html),
        js: inline_js(html),
        resources: collect_resources(html).render(),
    }
}

/// Inner text of every `<style>` block in document order.
pub fn inline_css(html: &str) -> String {
    let mut combined = String::new();
    for caps in STYLE_BLOCK.captures_iter(html) {
        combined.push_str(caps.get(1).map_or("", |m| m.as_str()));
        combined.push_str(BLOCK_SEPARATOR);
    }
    if combined.is_empty() {
        NO_CSS_PLACEHOLDER.to_string()
    } else {
        combined
    }
}

/// Inner text of every inline `<script>` block.
///
/// Blocks whose opening tag has a `src` attribute are external and skipped even
/// when they carry a body, as are blocks that are empty or whitespace.
pub fn inline_js(html: &str) -> String {
    let mut combined = String::new();
    for caps in SCRIPT_BLOCK.captures_iter(html) {
        let open_tag = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());
        if SRC_ATTR.is_match(open_tag) || body.trim().is_empty() {
            continue;
        }
        combined.push_str(body);
        combined.push_str(BLOCK_SEPARATOR);
    }
    if combined.is_empty() {
        NO_JS_PLACEHOLDER.to_string()
    } else {
        combined
    }
}
