// src/report/html.rs
// =============================================================================
// Standalone HTML report.
//
// Every page and every link is listed. Each link div carries two classes:
// ok/broken and internal/external, so the page can be styled or scraped.
// All text from the site (paths, URLs, error messages) is escaped.
// =============================================================================

use super::{status_text, ReportSummary};
use crate::checker::BrokenPolicy;
use crate::scanner::Page;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use html_escape::encode_text;
use std::io::Write;

const STYLE: &str = r#"        body { font-family: Arial, sans-serif; margin: 20px; }
        .summary { background: #f5f5f5; padding: 15px; border-radius: 5px; margin-bottom: 20px; }
        .file { margin-bottom: 20px; border: 1px solid #ddd; padding: 15px; border-radius: 5px; }
        .file h3 { margin-top: 0; color: #333; }
        .link { margin: 5px 0; padding: 5px; }
        .link.broken { background: #ffe6e6; color: #d00; }
        .link.ok { background: #e6ffe6; color: #060; }
        .internal { font-style: italic; }
        .external { font-weight: bold; }"#;

pub fn write(
    pages: &[Page],
    policy: &BrokenPolicy,
    generated_at: DateTime<Utc>,
    writer: &mut dyn Write,
) -> Result<()> {
    let summary = ReportSummary::from_pages(pages, policy);

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "    <meta charset=\"utf-8\">")?;
    writeln!(writer, "    <title>Site Link Checker Report</title>")?;
    writeln!(writer, "    <style>\n{}\n    </style>", STYLE)?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;
    writeln!(writer, "    <h1>Site Link Checker Report</h1>")?;
    writeln!(
        writer,
        "    <p>Generated: {}</p>",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;

    writeln!(writer, "    <div class=\"summary\">")?;
    writeln!(writer, "        <h2>Summary</h2>")?;
    writeln!(writer, "        <ul>")?;
    for (label, value) in [
        ("Files scanned", summary.total_files),
        ("Total links", summary.total_links),
        ("Unique links", summary.unique_links),
        ("Broken links", summary.broken_links),
        ("Internal links", summary.internal_links),
        ("External links", summary.external_links),
    ] {
        writeln!(writer, "            <li>{}: {}</li>", label, value)?;
    }
    writeln!(writer, "        </ul>")?;
    writeln!(writer, "    </div>")?;

    for page in pages {
        writeln!(writer, "    <div class=\"file\">")?;
        writeln!(writer, "        <h3>{}</h3>", encode_text(&page.path.display().to_string()))?;
        writeln!(
            writer,
            "        <p><strong>Canonical:</strong> {}</p>",
            encode_text(&page.canonical_path.display().to_string())
        )?;
        writeln!(writer, "        <p><strong>Links found:</strong> {}</p>", page.links.len())?;

        for link in &page.links {
            let broken = policy.is_broken(link);
            let state = if broken { "broken" } else { "ok" };
            let kind = link.kind.as_str();
            writeln!(
                writer,
                "        <div class=\"link {} {}\">{} [{}] - {}</div>",
                state,
                kind,
                encode_text(&link.url),
                kind,
                encode_text(&status_text(broken, &link.error_message))
            )?;
        }

        writeln!(writer, "    </div>")?;
    }

    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::checked_pages;
    use crate::scanner::{Link, LinkOutcome};
    use scraper::{Html, Selector};

    fn render(pages: &[Page]) -> Html {
        let mut out = Vec::new();
        write(pages, &BrokenPolicy::default(), Utc::now(), &mut out).unwrap();
        Html::parse_document(&String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_html_report_classes() {
        let document = render(&checked_pages());

        let files = Selector::parse("div.file").unwrap();
        let broken = Selector::parse("div.link.broken").unwrap();
        let external_ok = Selector::parse("div.link.ok.external").unwrap();

        assert_eq!(document.select(&files).count(), 3);
        assert_eq!(document.select(&broken).count(), 2);
        assert_eq!(document.select(&external_ok).count(), 3);
    }

    #[test]
    fn test_html_report_escapes_text() {
        let mut page = Page::new("content/<evil>.md", "/site/content/<evil>.md");
        let mut link = Link::new("/search?q=<script>");
        link.record(LinkOutcome::not_found("file not found"));
        page.links.push(link);

        let document = render(&[page]);
        let script = Selector::parse("script").unwrap();
        let broken = Selector::parse("div.link.broken").unwrap();

        assert_eq!(document.select(&script).count(), 0);
        let text: String = document.select(&broken).next().unwrap().text().collect();
        assert!(text.starts_with("/search?q=<script> [internal]"));
    }
}
