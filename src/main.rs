// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Find the pages to scan and extract their links
// 3. Mark links matched by the ignore file
// 4. Validate every link (filesystem, HTTP, DNS)
// 5. Render the report and exit (0 = no broken links, 1 = broken links,
//    2 = error)
// =============================================================================

mod checker;       // src/checker/ - validation of extracted links
mod cli;           // src/cli.rs - command-line parsing
mod error;         // src/error.rs - typed errors for the library parts
mod report;        // src/report/ - text/json/html renderers
mod scanner;       // src/scanner/ - page discovery and link extraction

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::{info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err   = the run could not complete
async fn run(cli: Cli) -> Result<i32> {
    let roots = cli.scan_paths();
    let mut pages = scanner::enumerate_pages(&roots, &scanner::PAGE_EXTENSIONS)?;
    info!("found {} page(s) to scan", pages.len());

    let ignore = checker::IgnoreSet::load(&cli.ignore_file)?;
    if !ignore.is_empty() {
        info!("loaded {} ignore pattern(s) from {}", ignore.len(), cli.ignore_file.display());
    }

    // A page that can't be read keeps whatever links were read before the
    // failure; the rest of the run goes on
    let mut total_links = 0;
    let mut ignored = 0;
    for page in &mut pages {
        if let Err(e) = page.load_links(cli.check_images) {
            warn!("{}", e);
        }
        ignored += ignore.apply_to_page(page);
        total_links += page.links.len();
    }
    info!("extracted {} link(s), {} ignored", total_links, ignored);

    let checker = checker::LinkChecker::new(cli.check_options(), cli.timeout())?;
    checker.check_pages(&mut pages).await;

    let policy = cli.broken_policy();
    let broken = checker::count_broken(&pages, &policy);

    if !cli.no_report {
        report::generate_report(&pages, cli.format, &policy, cli.output.as_deref())?;
    }

    if broken > 0 {
        info!("{} broken link(s) found", broken);
        Ok(1)
    } else {
        info!("no broken links found");
        Ok(0)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why std::process::exit instead of returning from main?
//    - The exit code carries the result (CI pipelines check it), and
//      returning from main only gives us success or failure
//
// 2. Where does logging go?
//    - env_logger writes to stderr, the report goes to stdout or --output,
//      so `site-link-checker --format json > report.json` stays valid JSON
//    - RUST_LOG overrides the level picked from --verbose
// -----------------------------------------------------------------------------
