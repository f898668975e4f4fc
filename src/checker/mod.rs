// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - ignore: user-supplied patterns for links we should skip
// - resolve: internal links against the content/static/public trees
// - http: HEAD/GET probes for external links
// - mail: MX/host lookups for mailto: links
// - aggregate: the broken-link predicate and counter
//
// This file ties them together. LinkChecker walks every link of every page:
// links that can be settled locally (ignored, template syntax, filesystem
// lookups, external checking disabled) are recorded right away, and the ones
// that need the network are fanned out with a concurrency limit. Network
// results come back tagged with their (page, link) index and are written
// into place, so report order never depends on which host answered first.
// =============================================================================

mod aggregate;
mod http;
mod ignore;
mod mail;
mod resolve;

pub use aggregate::{count_broken, BrokenPolicy};
pub use http::{HttpProbe, DEFAULT_TIMEOUT};
pub use ignore::IgnoreSet;
pub use mail::{DnsLookup, DomainLookup, MailChecker};
pub use resolve::{FsProbe, InternalResolver, PathProbe, SiteLayout};

use crate::error::CheckerError;
use crate::scanner::{is_mailto, Link, LinkKind, LinkOutcome, Page};
use futures::stream::{self, StreamExt};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 50;

/// What to record for external links when external checking is off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UncheckedExternal {
    /// Status 0 with no error: reported as unchecked, not broken
    #[default]
    Skip,
    /// Status 200: treated as valid
    AssumeValid,
    /// Status 0 with "External link checking disabled": counts as broken
    Flag,
}

impl UncheckedExternal {
    pub fn outcome(&self) -> LinkOutcome {
        match self {
            UncheckedExternal::Skip => LinkOutcome::not_evaluated(),
            UncheckedExternal::AssumeValid => LinkOutcome::valid(),
            UncheckedExternal::Flag => LinkOutcome::failed("External link checking disabled"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Base directory for internal link resolution
    pub site_root: PathBuf,
    pub check_external: bool,
    /// Source tree (content/, static/) or built output (public/)
    pub layout: SiteLayout,
    /// When set, internal links are checked against this live site instead
    /// of the local tree
    pub base_url: Option<String>,
    /// Keep the list of candidate paths and put it in "not found" errors
    pub verbose: bool,
    pub unchecked_external: UncheckedExternal,
    /// How many network probes may run at once
    pub concurrency: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            site_root: PathBuf::from("."),
            check_external: false,
            layout: SiteLayout::Source,
            base_url: None,
            verbose: false,
            unchecked_external: UncheckedExternal::Skip,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

// Validates external links: mailto: by DNS, everything else over HTTP
pub struct ExternalValidator<L = DnsLookup> {
    http: HttpProbe,
    mail: MailChecker<L>,
}

impl ExternalValidator<DnsLookup> {
    pub fn new(timeout: Duration) -> Result<Self, CheckerError> {
        Ok(Self::with_lookup(HttpProbe::new(timeout)?, DnsLookup::from_system()))
    }
}

impl<L: DomainLookup> ExternalValidator<L> {
    pub fn with_lookup(http: HttpProbe, lookup: L) -> Self {
        ExternalValidator {
            http,
            mail: MailChecker::new(lookup),
        }
    }

    pub async fn validate(&self, url: &str) -> LinkOutcome {
        if is_mailto(url) {
            self.mail.check(url).await
        } else {
            self.http.probe(url).await
        }
    }
}

// Work that has to go to the network
#[derive(Debug, Clone, PartialEq, Eq)]
enum NetworkCheck {
    /// Internal link checked against the deployed site
    Remote(String),
    External(String),
}

// What to do with one link
#[derive(Debug, Clone, PartialEq, Eq)]
enum Plan {
    Settled(LinkOutcome),
    Probe(NetworkCheck),
}

pub struct LinkChecker<P = FsProbe, L = DnsLookup> {
    options: CheckOptions,
    resolver: InternalResolver<P>,
    external: ExternalValidator<L>,
}

impl LinkChecker<FsProbe, DnsLookup> {
    pub fn new(options: CheckOptions, timeout: Duration) -> Result<Self, CheckerError> {
        let resolver = InternalResolver::new(&options.site_root, options.layout, options.verbose);
        let external = ExternalValidator::new(timeout)?;
        Ok(Self::with_parts(options, resolver, external))
    }
}

impl<P: PathProbe, L: DomainLookup> LinkChecker<P, L> {
    pub fn with_parts(options: CheckOptions, resolver: InternalResolver<P>, external: ExternalValidator<L>) -> Self {
        LinkChecker {
            options,
            resolver,
            external,
        }
    }

    // Validates every link of every page in place.
    //
    // Each link is written exactly once, and every link gets a
    // last_checked timestamp, including ignored and template links.
    pub async fn check_pages(&self, pages: &mut [Page]) {
        let mut pending = Vec::new();

        for (page_index, page) in pages.iter_mut().enumerate() {
            for (link_index, link) in page.links.iter_mut().enumerate() {
                match self.plan(link) {
                    Plan::Settled(outcome) => link.record(outcome),
                    Plan::Probe(check) => pending.push((page_index, link_index, check)),
                }
            }
        }

        if pending.is_empty() {
            return;
        }
        info!("checking {} link(s) over the network", pending.len());

        // Run up to `concurrency` probes at once; results arrive in
        // completion order and are put back by index
        let this = self;
        let results: Vec<(usize, usize, LinkOutcome)> = stream::iter(pending)
            .map(move |(page_index, link_index, check)| async move {
                (page_index, link_index, this.run(&check).await)
            })
            .buffer_unordered(self.options.concurrency.max(1))
            .collect()
            .await;

        for (page_index, link_index, outcome) in results {
            pages[page_index].links[link_index].record(outcome);
        }
    }

    fn plan(&self, link: &Link) -> Plan {
        if link.ignored || link.is_template() {
            return Plan::Settled(LinkOutcome::valid());
        }

        match link.kind {
            LinkKind::Internal => match &self.options.base_url {
                Some(base_url) => {
                    let path = resolve::strip_fragment_and_query(&link.url);
                    if path.is_empty() {
                        Plan::Settled(LinkOutcome::valid())
                    } else {
                        Plan::Probe(NetworkCheck::Remote(join_base_url(base_url, path)))
                    }
                }
                None => Plan::Settled(self.resolver.check(&link.url)),
            },
            LinkKind::External if self.options.check_external => {
                Plan::Probe(NetworkCheck::External(link.url.clone()))
            }
            LinkKind::External => Plan::Settled(self.options.unchecked_external.outcome()),
        }
    }

    async fn run(&self, check: &NetworkCheck) -> LinkOutcome {
        match check {
            NetworkCheck::Remote(url) => self.external.http.probe(url).await,
            NetworkCheck::External(url) => self.external.validate(url).await,
        }
    }
}

//   https://example.com/ + /about/  ->  https://example.com/about/
//   https://example.com  + about/   ->  https://example.com/about/
fn join_base_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
