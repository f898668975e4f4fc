// src/report/mod.rs
// =============================================================================
// Renders the checked pages as a report.
//
// Three formats:
// - text: summary plus only the pages that have broken links
// - json: summary plus every unique link and the files it was found in
// - html: standalone page with every file and link, broken ones highlighted
//
// All of them decide "broken" through the same BrokenPolicy the exit code
// uses.
// =============================================================================

mod html;
mod json;
mod text;

use crate::checker::BrokenPolicy;
use crate::scanner::{LinkKind, Page};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    pub total_files: usize,
    pub total_links: usize,
    pub unique_links: usize,
    pub broken_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
}

impl ReportSummary {
    pub fn from_pages(pages: &[Page], policy: &BrokenPolicy) -> Self {
        let mut summary = ReportSummary {
            total_files: pages.len(),
            ..Default::default()
        };
        let mut unique = HashSet::new();

        for link in pages.iter().flat_map(|page| page.links.iter()) {
            summary.total_links += 1;
            unique.insert(link.url.as_str());

            match link.kind {
                LinkKind::Internal => summary.internal_links += 1,
                LinkKind::External => summary.external_links += 1,
            }

            if policy.is_broken(link) {
                summary.broken_links += 1;
            }
        }

        summary.unique_links = unique.len();
        summary
    }
}

/// One URL across the whole site, with every file that links to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueLink {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub status_code: u16,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error_message: String,
    pub last_checked: Option<DateTime<Utc>>,
    pub found_in_files: Vec<String>,
}

// Unique links in first-seen order. Status comes from the first occurrence.
pub fn unique_links(pages: &[Page]) -> Vec<UniqueLink> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut links: Vec<UniqueLink> = Vec::new();

    for page in pages {
        let file = page.path.display().to_string();
        for link in &page.links {
            match index.get(link.url.as_str()) {
                Some(&i) => links[i].found_in_files.push(file.clone()),
                None => {
                    index.insert(link.url.as_str(), links.len());
                    links.push(UniqueLink {
                        url: link.url.clone(),
                        kind: link.kind,
                        status_code: link.status_code,
                        error_message: link.error_message.clone(),
                        last_checked: link.last_checked,
                        found_in_files: vec![file.clone()],
                    });
                }
            }
        }
    }

    links
}

// Status text shown next to a link in the text and HTML reports
fn status_text(link_is_broken: bool, error_message: &str) -> String {
    match (link_is_broken, error_message.is_empty()) {
        (false, _) => "OK".to_string(),
        (true, true) => "BROKEN".to_string(),
        (true, false) => format!("BROKEN ({})", error_message),
    }
}

pub fn write_report(
    pages: &[Page],
    format: ReportFormat,
    policy: &BrokenPolicy,
    writer: &mut dyn Write,
) -> Result<()> {
    let generated_at = Utc::now();
    match format {
        ReportFormat::Text => text::write(pages, policy, generated_at, writer),
        ReportFormat::Json => json::write(pages, policy, generated_at, writer),
        ReportFormat::Html => html::write(pages, policy, generated_at, writer),
    }
}

// Writes the report to `output`, or to stdout when no file is given
pub fn generate_report(
    pages: &[Page],
    format: ReportFormat,
    policy: &BrokenPolicy,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(pages, format, policy, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_report(pages, format, policy, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scanner::{Link, LinkOutcome};

    pub(crate) fn checked_pages() -> Vec<Page> {
        fn link(url: &str, outcome: LinkOutcome) -> Link {
            let mut link = Link::new(url);
            link.record(outcome);
            link
        }

        let mut about = Page::new("content/about.md", "/site/content/about.md");
        about.links = vec![
            link("/contact/", LinkOutcome::valid()),
            link("/missing/", LinkOutcome::not_found("file not found")),
            link("https://example.com/", LinkOutcome::http(200)),
        ];

        let mut posts = Page::new("content/posts/_index.md", "/site/content/posts/_index.md");
        posts.links = vec![
            link("https://example.com/", LinkOutcome::http(200)),
            link("https://example.com/gone", LinkOutcome::http(404)),
            link("https://unchecked.example/", LinkOutcome::not_evaluated()),
        ];

        let mut clean = Page::new("content/clean.md", "/site/content/clean.md");
        clean.links = vec![link("/about/", LinkOutcome::valid())];

        vec![about, posts, clean]
    }

    #[test]
    fn test_summary() {
        let summary = ReportSummary::from_pages(&checked_pages(), &BrokenPolicy::default());
        assert_eq!(
            summary,
            ReportSummary {
                total_files: 3,
                total_links: 7,
                unique_links: 6,
                broken_links: 2,
                internal_links: 3,
                external_links: 4,
            }
        );
    }

    #[test]
    fn test_unique_links_keep_first_seen_order() {
        let links = unique_links(&checked_pages());
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "/contact/",
                "/missing/",
                "https://example.com/",
                "https://example.com/gone",
                "https://unchecked.example/",
                "/about/",
            ]
        );
        assert_eq!(
            links[2].found_in_files,
            vec!["content/about.md".to_string(), "content/posts/_index.md".to_string()]
        );
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(false, ""), "OK");
        assert_eq!(status_text(true, ""), "BROKEN");
        assert_eq!(status_text(true, "HTTP 404"), "BROKEN (HTTP 404)");
    }

    #[test]
    fn test_generate_report_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("report.txt");
        generate_report(&checked_pages(), ReportFormat::Text, &BrokenPolicy::default(), Some(&output)).unwrap();
        assert!(std::fs::read_to_string(output).unwrap().contains("Broken links: 2"));
    }
}
