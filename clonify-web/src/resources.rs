//! External resources referenced by a page: stylesheets, scripts and images.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Only the first this-many distinct images are listed.
pub const MAX_LISTED_IMAGES: usize = 20;

static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<link\b[^>]*>").expect("link regex"));
static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script\b[^>]*>").expect("script regex"));
static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("img regex"));
static HREF_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\shref\s*=\s*["']([^"']+)["']"#).expect("href regex")
});
static SRC_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\ssrc\s*=\s*["']([^"']+)["']"#).expect("src regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Stylesheet,
    Script,
    Image,
}

impl ResourceKind {
    fn heading(self) -> &'static str {
        match self {
            ResourceKind::Stylesheet => "📄 CSS Files:",
            ResourceKind::Script => "⚡ JavaScript Files:",
            ResourceKind::Image => "🖼️ Images:",
        }
    }
}

/// A URL tagged with the kind of element that referenced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceList {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    /// Distinct image URLs in first-seen order, capped at [`MAX_LISTED_IMAGES`].
    pub images: Vec<String>,
    /// Distinct images left out by the cap.
    pub hidden_images: usize,
}

impl ResourceList {
    pub fn is_empty(&self) -> bool {
        self.stylesheets.is_empty() && self.scripts.is_empty() && self.images.is_empty()
    }

    /// Flatten into tagged references, stylesheets first.
    pub fn refs(&self) -> Vec<ResourceRef> {
        let tag = |kind: ResourceKind, urls: &[String]| {
            urls.iter()
                .map(move |url| ResourceRef {
                    kind,
                    url: url.clone(),
                })
                .collect::<Vec<_>>()
        };
        let mut out = tag(ResourceKind::Stylesheet, &self.stylesheets);
        out.extend(tag(ResourceKind::Script, &self.scripts));
        out.extend(tag(ResourceKind::Image, &self.images));
        out
    }

    /// The human-readable listing shown in the Resources panel.
    ///
    /// ```
    /// use clonify_web::resources::collect_resources;
    ///
    /// let listing = collect_resources(r#"<img src="a.png"><img src="a.png">"#).render();
    /// assert_eq!(listing, "External Resources:\n\n🖼️ Images:\n  • a.png\n");
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::from("External Resources:\n\n");
        let sections = [
            (ResourceKind::Stylesheet, &self.stylesheets),
            (ResourceKind::Script, &self.scripts),
        ];
        for (kind, urls) in sections {
            if urls.is_empty() {
                continue;
            }
            push_section(&mut out, kind, urls);
            out.push('\n');
        }
        if !self.images.is_empty() {
            push_section(&mut out, ResourceKind::Image, &self.images);
            if self.hidden_images > 0 {
                let _ = writeln!(out, "  ... and {} more images", self.hidden_images);
            }
        }
        out
    }
}

fn push_section(out: &mut String, kind: ResourceKind, urls: &[String]) {
    out.push_str(kind.heading());
    out.push('\n');
    for url in urls {
        let _ = writeln!(out, "  • {url}");
    }
}

fn attr_value<'a>(re: &Regex, tag: &'a str) -> Option<&'a str> {
    re.captures(tag).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Scan `html` for stylesheet links, external scripts and images.
pub fn collect_resources(html: &str) -> ResourceList {
    let stylesheets = LINK_TAG
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|tag| tag.contains("stylesheet"))
        .filter_map(|tag| attr_value(&HREF_VALUE, tag))
        .map(str::to_string)
        .collect();

    let scripts = SCRIPT_TAG
        .find_iter(html)
        .filter_map(|m| attr_value(&SRC_VALUE, m.as_str()))
        .map(str::to_string)
        .collect();

    let mut seen = HashSet::new();
    let mut distinct: Vec<String> = IMG_TAG
        .find_iter(html)
        .filter_map(|m| attr_value(&SRC_VALUE, m.as_str()))
        .filter(|src| seen.insert(*src))
        .map(str::to_string)
        .collect();
    let hidden_images = distinct.len().saturating_sub(MAX_LISTED_IMAGES);
    distinct.truncate(MAX_LISTED_IMAGES);

    ResourceList {
        stylesheets,
        scripts,
        images: distinct,
        hidden_images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> String {
        (0..n)
            .map(|i| format!(r#"<img alt="" src="/img/{i}.png">"#))
            .collect()
    }

    #[test]
    fn twenty_five_images_list_twenty_plus_note() {
        let list = collect_resources(&images(25));
        assert_eq!(list.images.len(), 20);
        assert_eq!(list.hidden_images, 5);

        let text = list.render();
        assert_eq!(text.matches("  • /img/").count(), 20);
        assert!(text.contains("/img/19.png"));
        assert!(!text.contains("/img/20.png"));
        assert!(text.ends_with("  ... and 5 more images\n"));
    }

    #[test]
    fn exactly_twenty_images_has_no_note() {
        let text = collect_resources(&images(20)).render();
        assert!(!text.contains("more images"));
    }

    #[test]
    fn duplicated_image_listed_once() {
        let html = r#"<img src="logo.svg"><p><img class="x" src='logo.svg'></p><IMG SRC="logo.svg">"#;
        let list = collect_resources(html);
        assert_eq!(list.images, vec!["logo.svg".to_string()]);
        assert_eq!(list.render().matches("logo.svg").count(), 1);
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let html = r#"<img src="b"><img src="a"><img src="b"><img src="c">"#;
        assert_eq!(collect_resources(html).images, vec!["b", "a", "c"]);
    }

    #[test]
    fn only_stylesheet_links_are_listed() {
        let html = r#"
            <link rel="stylesheet" href="/main.css">
            <link rel="icon" href="/favicon.ico">
            <link href='https://cdn.test/x.css' rel='stylesheet' media="all">
        "#;
        let list = collect_resources(html);
        assert_eq!(list.stylesheets, vec!["/main.css", "https://cdn.test/x.css"]);
    }

    #[test]
    fn external_scripts_are_listed_inline_ones_are_not() {
        let html = r#"<script src="/a.js"></script><script>inline()</script><script async src="https://cdn.test/b.js"></script>"#;
        let list = collect_resources(html);
        assert_eq!(list.scripts, vec!["/a.js", "https://cdn.test/b.js"]);
    }

    #[test]
    fn sections_without_entries_are_omitted() {
        let text = collect_resources(r#"<script src="/a.js"></script>"#).render();
        assert_eq!(text, "External Resources:\n\n⚡ JavaScript Files:\n  • /a.js\n\n");
        assert!(!text.contains("CSS Files"));
        assert!(!text.contains("Images"));
    }

    #[test]
    fn empty_page_renders_header_only() {
        let list = collect_resources("<p>nothing</p>");
        assert!(list.is_empty());
        assert_eq!(list.render(), "External Resources:\n\n");
    }

    #[test]
    fn unquoted_src_is_ignored() {
        assert!(collect_resources("<img src=a.png>").images.is_empty());
    }

    #[test]
    fn refs_are_tagged_by_kind() {
        let html = r#"<link rel="stylesheet" href="s.css"><script src="j.js"></script><img src="i.png">"#;
        let kinds: Vec<ResourceKind> = collect_resources(html).refs().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![ResourceKind::Stylesheet, ResourceKind::Script, ResourceKind::Image]
        );
    }
}
