// src/scanner/mod.rs
// =============================================================================
// This module turns files on disk into Pages full of Links.
//
// Submodules:
// - walk: finds the .md/.html/.htm files under the paths we were given
// - extract: pulls raw link URLs out of a page's text, line by line
// - classify: decides whether a URL is internal or external
//
// The types defined here (Page, Link, LinkOutcome) are shared by the
// checker and the report renderers.
// =============================================================================

mod classify;
mod extract;
mod walk;

pub use classify::classify;
pub use extract::LinkExtractor;
pub use walk::{enumerate_pages, PAGE_EXTENSIONS};

use crate::error::CheckerError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Whether a link points into the site or out to the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// No scheme and no host: a path inside the site
    Internal,
    /// Has a scheme or a host (http:, https:, ftp:, mailto:, //host/...)
    External,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Internal => "internal",
            LinkKind::External => "external",
        }
    }
}

// The result of validating one link.
//
// status_code and error_message always travel together: validators build
// one of these and Link::record writes both fields at once.
//
//   0   + ""       -> not evaluated
//   0   + "..."    -> evaluation failed without an HTTP status
//   200 + ""       -> valid (also used for filesystem and mail-domain hits)
//   >=400 + "..."  -> broken
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LinkOutcome {
    pub status_code: u16,
    pub error_message: String,
}

impl LinkOutcome {
    pub fn valid() -> Self {
        LinkOutcome {
            status_code: 200,
            error_message: String::new(),
        }
    }

    pub fn not_evaluated() -> Self {
        LinkOutcome::default()
    }

    pub fn failed(message: impl Into<String>) -> Self {
        LinkOutcome {
            status_code: 0,
            error_message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        LinkOutcome {
            status_code: 404,
            error_message: message.into(),
        }
    }

    // Any HTTP response is an outcome; codes >= 400 carry "HTTP <code>"
    pub fn http(status_code: u16) -> Self {
        let error_message = if status_code >= 400 {
            format!("HTTP {}", status_code)
        } else {
            String::new()
        };
        LinkOutcome {
            status_code,
            error_message,
        }
    }
}

/// One link discovered in a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// The URL exactly as it appeared in the source (trimmed)
    pub url: String,
    /// Internal or external, decided once when the link is created
    #[serde(rename = "type")]
    pub kind: LinkKind,
    /// Set by the ignore filter; never cleared
    pub ignored: bool,
    pub status_code: u16,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error_message: String,
    /// When validation finished for this link
    pub last_checked: Option<DateTime<Utc>>,
}

impl Link {
    // Creates a link and classifies it right away
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = classify(&url);
        Link {
            url,
            kind,
            ignored: false,
            status_code: 0,
            error_message: String::new(),
            last_checked: None,
        }
    }

    // Stores a validation outcome and stamps the check time.
    pub fn record(&mut self, outcome: LinkOutcome) {
        self.status_code = outcome.status_code;
        self.error_message = outcome.error_message;
        self.last_checked = Some(Utc::now());
    }

    pub fn is_mailto(&self) -> bool {
        is_mailto(&self.url)
    }

    // Unexpanded template expressions like {{ .Site.BaseURL }} or {{< ref >}}
    pub fn is_template(&self) -> bool {
        self.url.contains("{{") || self.url.contains("}}")
    }
}

pub fn is_mailto(url: &str) -> bool {
    url.get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
}

/// One scanned document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// The path as found during enumeration (may be relative)
    pub path: PathBuf,
    /// Absolute, symlink-resolved path; the dedup key across inputs
    pub canonical_path: PathBuf,
    /// Links in first-seen order, unique by URL
    pub links: Vec<Link>,
}

impl Page {
    pub fn new(path: impl Into<PathBuf>, canonical_path: impl Into<PathBuf>) -> Self {
        Page {
            path: path.into(),
            canonical_path: canonical_path.into(),
            links: Vec::new(),
        }
    }

    // Reads the page from disk and extracts its links.
    //
    // Lines are decoded lossily, so a page in a legacy encoding still has
    // all of its links found. Only a real I/O failure is an error; the links
    // extracted from the lines read so far are kept and the error is
    // returned to the caller.
    pub fn load_links(&mut self, check_images: bool) -> Result<(), CheckerError> {
        let read_error = |path: &Path, source| CheckerError::ReadPage {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(&self.path).map_err(|e| read_error(&self.path, e))?;
        let mut reader = BufReader::new(file);
        let mut extractor = LinkExtractor::new(check_images);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    extractor.scan_line(line.trim_end_matches(['\n', '\r']));
                }
                Err(e) => {
                    self.links = extractor.finish();
                    return Err(read_error(&self.path, e));
                }
            }
        }

        self.links = extractor.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_link_is_classified() {
        assert_eq!(Link::new("https://example.com").kind, LinkKind::External);
        assert_eq!(Link::new("/about/").kind, LinkKind::Internal);
    }

    #[test]
    fn test_record_writes_status_and_error_together() {
        let mut link = Link::new("https://example.com/gone");
        link.record(LinkOutcome::http(404));
        assert_eq!(link.status_code, 404);
        assert_eq!(link.error_message, "HTTP 404");
        assert!(link.last_checked.is_some());

        link.record(LinkOutcome::valid());
        assert_eq!(link.status_code, 200);
        assert!(link.error_message.is_empty());
    }

    #[test]
    fn test_http_outcome_below_400_has_no_error() {
        assert_eq!(LinkOutcome::http(301), LinkOutcome { status_code: 301, error_message: String::new() });
    }

    #[test]
    fn test_template_detection() {
        assert!(Link::new("{{.Site.BaseURL}}/about").is_template());
        assert!(Link::new("{{< ref \"other\" >}}").is_template());
        assert!(!Link::new("/about/").is_template());
    }

    #[test]
    fn test_mailto_detection_is_case_insensitive() {
        assert!(is_mailto("mailto:a@b.c"));
        assert!(is_mailto("MAILTO:a@b.c"));
        assert!(!is_mailto("mail"));
    }

    #[test]
    fn test_load_links_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Title").unwrap();
        writeln!(file, "[Docs](/docs/) and [Rust](https://www.rust-lang.org)").unwrap();
        writeln!(file, "[again](/docs/)").unwrap();

        let mut page = Page::new(file.path(), file.path());
        page.load_links(false).unwrap();

        let urls: Vec<_> = page.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["/docs/", "https://www.rust-lang.org"]);
    }

    #[test]
    fn test_load_links_missing_file_is_error() {
        let mut page = Page::new("/definitely/not/here.md", "/definitely/not/here.md");
        let err = page.load_links(false).unwrap_err();
        assert!(matches!(err, CheckerError::ReadPage { .. }));
    }

    #[test]
    fn test_load_links_reads_past_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[first](/first/)\n").unwrap();
        file.write_all(&[0xff, 0xfe, b'\n']).unwrap();
        file.write_all(b"[second](/second/)\n").unwrap();

        let mut page = Page::new(file.path(), file.path());
        page.load_links(false).unwrap();

        let urls: Vec<_> = page.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["/first/", "/second/"]);
    }

    #[test]
    fn test_load_links_from_latin1_html() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<p>Caf\xe9</p>\r\n<a href=\"/later/\">x</a>").unwrap();

        let mut page = Page::new(file.path(), file.path());
        page.load_links(false).unwrap();

        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].url, "/later/");
    }
}
