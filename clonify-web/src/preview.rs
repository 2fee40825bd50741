//! Text-mode preview of a fetched page.
//!
//! Unlike [`crate::extract`], this parses the document with `scraper` so that
//! entities are decoded and script/style bodies never leak into the text.

use std::path::PathBuf;

use clonify_common::Result;
use scraper::{Html, Selector};

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub title: Option<String>,
    /// Visible text, one paragraph per block element.
    pub text: String,
}

impl Preview {
    pub fn render(&self) -> String {
        let title = self.title.as_deref().unwrap_or("(untitled)");
        if self.text.is_empty() {
            format!("Title: {title}\n\n(no visible text)")
        } else {
            format!("Title: {title}\n\n{}", self.text)
        }
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the preview for `html`.
///
/// ```
/// use clonify_web::preview::render_preview;
///
/// let p = render_preview("<title> Hi </title><p>One &amp; two</p><script>x()</script><p>Three</p>");
/// assert_eq!(p.title.as_deref(), Some("Hi"));
/// assert_eq!(p.text, "One & two\n\nThree");
/// ```
pub fn render_preview(html: &str) -> Preview {
    let document = Html::parse_document(html);

    let title = Selector::parse("title").ok().and_then(|sel| {
        document
            .select(&sel)
            .next()
            .map(|el| collapse_ws(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    });

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_block = None;

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let mut block = None;
        let mut hidden = false;
        for ancestor in node.ancestors() {
            if let Some(el) = ancestor.value().as_element() {
                if SKIPPED.contains(&el.name()) {
                    hidden = true;
                    break;
                }
                if block.is_none() && BLOCKS.contains(&el.name()) {
                    block = Some(ancestor.id());
                }
            }
        }
        if hidden {
            continue;
        }
        let piece = collapse_ws(text);
        if piece.is_empty() {
            continue;
        }
        if block != current_block && !current.is_empty() {
            paragraphs.push(std::mem::take(&mut current));
        }
        current_block = block;
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&piece);
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Preview {
        title,
        text: paragraphs.join("\n\n"),
    }
}

/// Write `html` to a fresh file in the system temp dir so it can be opened in
/// a real browser.
pub async fn write_preview_file(html: &str) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("clonify-preview-{}.html", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, html.as_bytes()).await?;
    tracing::debug!(path = %path.display(), "preview.written");
    Ok(path)
}
