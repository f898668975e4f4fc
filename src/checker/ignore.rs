// src/checker/ignore.rs
// =============================================================================
// User-supplied ignore patterns.
//
// The ignore file is plain text, one regular expression per line. Blank
// lines and lines starting with '#' are skipped. A pattern matches if it
// is found anywhere in the link URL (search, not full match).
//
// Ignored links never reach a resolver or the network and never count as
// broken.
// =============================================================================

use crate::error::CheckerError;
use crate::scanner::{Link, Page};
use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Ordered set of compiled ignore patterns; first match wins
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Regex>,
}

impl IgnoreSet {
    // Loads patterns from a file. A missing file is just an empty set;
    // any other read failure is returned.
    pub fn load(path: &Path) -> Result<Self, CheckerError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no ignore file at {}", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(CheckerError::ReadIgnoreFile {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    // Invalid patterns are reported and skipped; the rest still apply.
    pub fn parse(text: &str) -> Self {
        let patterns = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| match Regex::new(line) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("invalid ignore pattern '{}': {}", line, e);
                    None
                }
            })
            .collect();

        IgnoreSet { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matching(&self, url: &str) -> Option<&Regex> {
        self.patterns.iter().find(|pattern| pattern.is_match(url))
    }

    // Marks the link ignored if any pattern matches. Returns whether it did.
    pub fn apply(&self, link: &mut Link) -> bool {
        match self.matching(&link.url) {
            Some(pattern) => {
                debug!("ignoring link {} (matched pattern {})", link.url, pattern.as_str());
                link.ignored = true;
                true
            }
            None => false,
        }
    }

    pub fn apply_to_page(&self, page: &mut Page) -> usize {
        if self.is_empty() {
            return 0;
        }
        page.links
            .iter_mut()
            .map(|link| self.apply(link))
            .filter(|&ignored| ignored)
            .count()
    }
}
