// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below IS the set of flags, and
// clap generates the parser, --help and --version from it.
//
// The rest of the program never looks at clap types directly. Cli hands out
// the pieces it needs (scan paths, CheckOptions, BrokenPolicy) through the
// helper methods at the bottom.
// =============================================================================

use crate::checker::{
    BrokenPolicy, CheckOptions, SiteLayout, UncheckedExternal, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT,
};
use crate::report::ReportFormat;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_IGNORE_FILE: &str = ".hugo-link-checker-ignore";

// #[derive(Parser)] tells clap to generate parsing code for this struct.
// Doc comments on the fields become the --help text.
#[derive(Parser, Debug)]
#[command(
    name = "site-link-checker",
    version,
    about = "Check the links in a static site's Markdown and HTML files",
    long_about = "site-link-checker scans the content of a static site (Markdown, HTML), \
                  resolves internal links against the source or built tree and optionally \
                  checks external links over HTTP and mailto: domains over DNS."
)]
pub struct Cli {
    /// Files or directories to scan (default: the site root)
    pub paths: Vec<PathBuf>,

    /// Site root used to resolve internal links
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only set the exit code, don't render a report
    #[arg(long)]
    pub no_report: bool,

    /// Also extract image links (![alt](src) and <img src>)
    #[arg(long)]
    pub check_images: bool,

    /// Check external links over the network
    #[arg(long)]
    pub check_external: bool,

    /// Resolve internal links against the built public/ directory
    #[arg(long)]
    pub check_public: bool,

    /// Check internal links against this deployed site instead of the local tree
    #[arg(long)]
    pub base_url: Option<String>,

    /// Debug logging, and list the checked paths for internal links that were not found
    #[arg(short, long)]
    pub verbose: bool,

    /// File with one regex per line; matching links are not validated
    #[arg(long, default_value = DEFAULT_IGNORE_FILE)]
    pub ignore_file: PathBuf,

    /// What to record for external links when --check-external is off
    #[arg(long, value_enum, default_value_t = UncheckedExternal::Skip)]
    pub unchecked_external: UncheckedExternal,

    /// Don't count unresolvable mailto: domains as broken
    #[arg(long)]
    pub mail_failures_not_broken: bool,

    /// Maximum number of network checks in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Network timeout per request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,
}

impl Cli {
    pub fn layout(&self) -> SiteLayout {
        if self.check_public {
            SiteLayout::Built
        } else {
            SiteLayout::Source
        }
    }

    // Explicit paths win; otherwise the whole site root is scanned
    pub fn scan_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![self.root.clone()]
        } else {
            self.paths.clone()
        }
    }

    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            site_root: self.root.clone(),
            check_external: self.check_external,
            layout: self.layout(),
            base_url: self.base_url.clone(),
            verbose: self.verbose,
            unchecked_external: self.unchecked_external,
            concurrency: self.concurrency,
        }
    }

    pub fn broken_policy(&self) -> BrokenPolicy {
        BrokenPolicy {
            count_mail_failures: !self.mail_failures_not_broken,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("site-link-checker").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.format, ReportFormat::Text);
        assert_eq!(cli.ignore_file, PathBuf::from(DEFAULT_IGNORE_FILE));
        assert_eq!(cli.scan_paths(), vec![PathBuf::from(".")]);
        assert_eq!(cli.timeout(), DEFAULT_TIMEOUT);

        let options = cli.check_options();
        assert!(!options.check_external);
        assert_eq!(options.layout, SiteLayout::Source);
        assert_eq!(options.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(options.unchecked_external, UncheckedExternal::Skip);
        assert!(cli.broken_policy().count_mail_failures);
    }

    #[test]
    fn test_check_public_uses_built_layout() {
        let cli = parse(&["--root", "site", "--check-public"]);
        assert_eq!(cli.scan_paths(), vec![PathBuf::from("site")]);
        assert_eq!(cli.check_options().layout, SiteLayout::Built);
    }

    #[test]
    fn test_explicit_paths_and_flags() {
        let cli = parse(&[
            "docs",
            "blog/post.md",
            "--format",
            "json",
            "--check-external",
            "--unchecked-external",
            "assume-valid",
            "--mail-failures-not-broken",
            "--base-url",
            "https://example.com",
            "--concurrency",
            "8",
        ]);

        assert_eq!(cli.scan_paths(), vec![PathBuf::from("docs"), PathBuf::from("blog/post.md")]);
        assert_eq!(cli.format, ReportFormat::Json);
        assert!(!cli.broken_policy().count_mail_failures);

        let options = cli.check_options();
        assert!(options.check_external);
        assert_eq!(options.unchecked_external, UncheckedExternal::AssumeValid);
        assert_eq!(options.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(options.concurrency, 8);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["site-link-checker", "--format", "xml"]).is_err());
    }
}
