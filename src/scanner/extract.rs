// src/scanner/extract.rs
// =============================================================================
// This module extracts link URLs from the raw text of a Markdown or HTML page.
//
// Nothing is parsed into a tree here. Content trees mix Markdown and HTML
// (raw HTML inside Markdown, shortcodes, front matter), so a fixed set of
// regex patterns applied line by line finds the link shapes we care about:
//
//   [text](url)              Markdown inline link (and image)
//   <https://...>            Markdown autolink
//   [ref]: url               Markdown reference definition
//   <a href="url">           HTML anchor
//   <link href="url">        HTML link element
//   ![alt](src), <img src>   only when image checking is on
//
// A link never spans lines.
// =============================================================================

use super::Link;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// A compiled pattern plus the capture group that holds the URL
struct LinkPattern {
    regex: Regex,
    group: usize,
}

impl LinkPattern {
    fn new(pattern: &str, group: usize) -> Self {
        LinkPattern {
            regex: Regex::new(pattern).expect("link pattern is a valid regex"),
            group,
        }
    }
}

static LINK_PATTERNS: LazyLock<Vec<LinkPattern>> = LazyLock::new(|| {
    vec![
        LinkPattern::new(r"\[([^\]]*)\]\(([^)]+)\)", 2),
        LinkPattern::new(r"<([a-zA-Z][a-zA-Z0-9+.\-]*://[^>\s]+)>", 1),
        LinkPattern::new(r"^\s*\[([^\]]+)\]:\s*(.+)$", 2),
        LinkPattern::new(r#"(?i)<a\s+[^>]*href\s*=\s*["']([^"']+)["'][^>]*>"#, 1),
        LinkPattern::new(r#"(?i)<link\s+[^>]*href\s*=\s*["']([^"']+)["'][^>]*>"#, 1),
    ]
});

static IMAGE_PATTERNS: LazyLock<Vec<LinkPattern>> = LazyLock::new(|| {
    vec![
        LinkPattern::new(r"!\[([^\]]*)\]\(([^)]+)\)", 2),
        LinkPattern::new(r#"(?i)<img\s+[^>]*src\s*=\s*["']([^"']+)["'][^>]*>"#, 1),
    ]
});

// Incremental extractor: feed it lines, then take the links.
//
// Keeps first-seen order and drops exact duplicates (case-sensitive).
pub struct LinkExtractor {
    check_images: bool,
    seen: HashSet<String>,
    links: Vec<Link>,
}

impl LinkExtractor {
    pub fn new(check_images: bool) -> Self {
        LinkExtractor {
            check_images,
            seen: HashSet::new(),
            links: Vec::new(),
        }
    }

    pub fn scan_line(&mut self, line: &str) {
        let image_patterns: &[LinkPattern] = if self.check_images {
            IMAGE_PATTERNS.as_slice()
        } else {
            &[]
        };

        for pattern in LINK_PATTERNS.iter().chain(image_patterns) {
            for captures in pattern.regex.captures_iter(line) {
                if let Some(raw) = captures.get(pattern.group) {
                    self.push(clean_url(raw.as_str()));
                }
            }
        }
    }

    fn push(&mut self, url: &str) {
        if url.is_empty() || url == "#" {
            return;
        }
        if self.seen.insert(url.to_string()) {
            self.links.push(Link::new(url));
        }
    }

    pub fn finish(self) -> Vec<Link> {
        self.links
    }
}

// Trims a captured URL and cuts off an inline title:
//   (/about/ "About us")  ->  /about/
fn clean_url(raw: &str) -> &str {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|c: char| c == ' ' || c == '"')
        .unwrap_or(trimmed.len());
    trimmed[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::LinkKind;

    fn extract_links(text: &str, check_images: bool) -> Vec<Link> {
        let mut extractor = LinkExtractor::new(check_images);
        for line in text.lines() {
            extractor.scan_line(line);
        }
        extractor.finish()
    }

    fn urls(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.url.as_str()).collect()
    }

    #[test]
    fn test_extract_markdown_links() {
        let markdown = r#"# Test Markdown File

## Standard Links
[Google](https://www.google.com)
[Internal Link](./internal-page.html)
[Another Internal](../docs/readme.md)

## Autolinks
<https://example.com>
<http://test.org>

## Reference Links
[Reference Link][ref1]
[Another Reference][ref2]

[ref1]: https://reference1.com
[ref2]: ./local-reference.html

## Mixed Content
Here's a [mixed link](https://mixed.example.com) in a sentence.
And an internal [relative link](./relative.md) too.
"#;
        let links = extract_links(markdown, false);
        assert_eq!(
            urls(&links),
            vec![
                "https://www.google.com",
                "./internal-page.html",
                "../docs/readme.md",
                "https://example.com",
                "http://test.org",
                "https://reference1.com",
                "./local-reference.html",
                "https://mixed.example.com",
                "./relative.md",
            ]
        );
        assert_eq!(links[0].kind, LinkKind::External);
        assert_eq!(links[1].kind, LinkKind::Internal);
    }

    #[test]
    fn test_extract_html_links() {
        let html = r#"<!DOCTYPE html>
<html>
<head>
    <link rel="stylesheet" href="./styles.css">
    <link rel="icon" href="https://example.com/favicon.ico">
</head>
<body>
    <a href="https://www.example.com">External Link</a>
    <a href="./internal.html">Internal Link</a>
    <a href="../docs/index.html" title="Documentation">Docs Link</a>
    <a href="mailto:test@example.com">Email Link</a>
    <A HREF='https://github.com/user/repo'>GitHub</A>
</body>
</html>"#;
        let links = extract_links(html, false);
        assert_eq!(
            urls(&links),
            vec![
                "./styles.css",
                "https://example.com/favicon.ico",
                "https://www.example.com",
                "./internal.html",
                "../docs/index.html",
                "mailto:test@example.com",
                "https://github.com/user/repo",
            ]
        );
        assert_eq!(links[5].kind, LinkKind::External);
    }

    #[test]
    fn test_inline_title_is_stripped() {
        let links = extract_links(r#"[About](/about/ "About us")"#, false);
        assert_eq!(urls(&links), vec!["/about/"]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let text = "[a](/one/) [b](/two/)\n[c](/one/) [d](/One/)";
        let links = extract_links(text, false);
        assert_eq!(urls(&links), vec!["/one/", "/two/", "/One/"]);
    }

    #[test]
    fn test_empty_and_bare_fragment_are_dropped() {
        let text = r##"[top](#) <a href="#">x</a> [ok](#section)"##;
        let links = extract_links(text, false);
        assert_eq!(urls(&links), vec!["#section"]);
    }

    #[test]
    fn test_img_tags_only_with_image_checking() {
        let text = r#"<img src="/images/logo.png" alt="logo">"#;
        assert!(extract_links(text, false).is_empty());
        assert_eq!(urls(&extract_links(text, true)), vec!["/images/logo.png"]);
    }

    #[test]
    fn test_autolink_needs_scheme() {
        let links = extract_links("<not-a-link> <ftp://files.example.com/a>", false);
        assert_eq!(urls(&links), vec!["ftp://files.example.com/a"]);
    }

    #[test]
    fn test_links_do_not_span_lines() {
        let links = extract_links("[broken\ntext](/nowhere/)", false);
        assert!(links.is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let text = "[a](/a/) <https://b.example> [c]: /c/";
        assert_eq!(extract_links(text, true), extract_links(text, true));
    }
}
