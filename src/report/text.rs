// src/report/text.rs
// Plain text report: summary, then only the pages that have broken links.

use super::{status_text, ReportSummary};
use crate::checker::BrokenPolicy;
use crate::scanner::Page;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

pub fn write(
    pages: &[Page],
    policy: &BrokenPolicy,
    generated_at: DateTime<Utc>,
    writer: &mut dyn Write,
) -> Result<()> {
    let summary = ReportSummary::from_pages(pages, policy);

    writeln!(writer, "Site Link Checker Report")?;
    writeln!(writer, "========================")?;
    writeln!(writer, "Generated: {}", generated_at.to_rfc3339_opts(SecondsFormat::Secs, true))?;
    writeln!(writer)?;

    writeln!(writer, "Summary:")?;
    writeln!(writer, "  Files scanned: {}", summary.total_files)?;
    writeln!(writer, "  Total links: {}", summary.total_links)?;
    writeln!(writer, "  Unique links: {}", summary.unique_links)?;
    writeln!(writer, "  Broken links: {}", summary.broken_links)?;
    writeln!(writer, "  Internal links: {}", summary.internal_links)?;
    writeln!(writer, "  External links: {}", summary.external_links)?;
    writeln!(writer)?;

    for page in pages {
        let broken: Vec<_> = page.links.iter().filter(|link| policy.is_broken(link)).collect();
        if broken.is_empty() {
            continue;
        }

        writeln!(writer, "File: {}", page.path.display())?;
        writeln!(writer, "  Canonical: {}", page.canonical_path.display())?;
        writeln!(writer, "  Links (broken/total): {}/{}", broken.len(), page.links.len())?;
        for link in broken {
            writeln!(
                writer,
                "    {} [{}] - {}",
                link.url,
                link.kind.as_str(),
                status_text(true, &link.error_message)
            )?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
