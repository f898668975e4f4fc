// src/report/json.rs
// Machine-readable report: summary plus every unique link.

use super::{unique_links, ReportSummary, UniqueLink};
use crate::checker::BrokenPolicy;
use crate::scanner::Page;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct JsonReport {
    generated_at: DateTime<Utc>,
    summary: ReportSummary,
    links: Vec<UniqueLink>,
}

pub fn write(
    pages: &[Page],
    policy: &BrokenPolicy,
    generated_at: DateTime<Utc>,
    writer: &mut dyn Write,
) -> Result<()> {
    let report = JsonReport {
        generated_at,
        summary: ReportSummary::from_pages(pages, policy),
        links: unique_links(pages),
    };

    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}
