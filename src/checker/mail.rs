// src/checker/mail.rs
// =============================================================================
// Validates mailto: links by checking that the address's domain can
// receive mail.
//
// - Look up MX records for the domain
// - If that fails, fall back to a plain host (A/AAAA) lookup, since mail
//   can be delivered to a domain's address record when it has no MX
// - Malformed links (no '@', empty address) are reported on the link,
//   never as an error of the run
// =============================================================================

use crate::scanner::LinkOutcome;
use futures::future::{BoxFuture, FutureExt};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use log::{debug, warn};
use url::Url;

// DNS capability used by the mail check. Returns true when the lookup
// produced at least one record.
pub trait DomainLookup: Send + Sync {
    fn has_mail_exchange<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, bool>;
    fn has_host<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, bool>;
}

/// DomainLookup backed by the system resolver
pub struct DnsLookup {
    resolver: TokioAsyncResolver,
}

impl DnsLookup {
    // Uses /etc/resolv.conf (or the platform equivalent); falls back to
    // public defaults when the system config can't be read.
    pub fn from_system() -> Self {
        let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!("could not load system DNS config ({}), using defaults", e);
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        };
        DnsLookup { resolver }
    }
}

impl DomainLookup for DnsLookup {
    fn has_mail_exchange<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, bool> {
        async move {
            match self.resolver.mx_lookup(domain).await {
                Ok(records) => records.iter().next().is_some(),
                Err(e) => {
                    debug!("MX lookup for {} failed: {}", domain, e);
                    false
                }
            }
        }
        .boxed()
    }

    fn has_host<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, bool> {
        async move {
            match self.resolver.lookup_ip(domain).await {
                Ok(addresses) => addresses.iter().next().is_some(),
                Err(e) => {
                    debug!("host lookup for {} failed: {}", domain, e);
                    false
                }
            }
        }
        .boxed()
    }
}

pub struct MailChecker<L = DnsLookup> {
    lookup: L,
}

impl<L: DomainLookup> MailChecker<L> {
    pub fn new(lookup: L) -> Self {
        MailChecker { lookup }
    }

    pub async fn check(&self, url: &str) -> LinkOutcome {
        let domain = match mail_domain(url) {
            Ok(domain) => domain,
            Err(message) => return LinkOutcome::failed(message),
        };

        if self.lookup.has_mail_exchange(&domain).await || self.lookup.has_host(&domain).await {
            LinkOutcome::valid()
        } else {
            LinkOutcome::failed(format!("domain not found: {}", domain))
        }
    }
}

// Pulls the domain out of a mailto: URL.
//
//   mailto:someone@example.com?subject=hi  ->  example.com
//   mailto:a@example.com,b@example.org     ->  example.com (first address)
fn mail_domain(url: &str) -> Result<String, String> {
    let parsed = Url::parse(url).map_err(|e| format!("invalid mailto link: {}", e))?;

    let address = parsed.path().split(',').next().unwrap_or_default().trim();
    if address.is_empty() {
        return Err("empty email address".to_string());
    }

    let domain = match address.rsplit_once('@') {
        Some((_, domain)) if !domain.is_empty() => domain,
        _ => return Err(format!("invalid email address: {}", address)),
    };

    Ok(domain.to_lowercase())
}
