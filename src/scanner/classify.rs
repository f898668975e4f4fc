// src/scanner/classify.rs
// =============================================================================
// Decides whether a link is internal (a path inside the site) or external
// (something we have to ask the network about).
//
// The rule: a scheme or a host means external. mailto: has no host but it
// does have a scheme, so it is external too.
// =============================================================================

use super::LinkKind;
use regex::Regex;
use std::sync::LazyLock;
use url::{ParseError, Url};

// RFC 3986 scheme followed by ':'
static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme pattern is a valid regex"));

pub fn classify(url: &str) -> LinkKind {
    if url.is_empty() {
        return LinkKind::Internal;
    }

    match Url::parse(url) {
        // An absolute URL always carries a scheme
        Ok(_) => LinkKind::External,
        // Scheme-relative: //cdn.example.com/lib.js
        Err(ParseError::RelativeUrlWithoutBase) if has_authority(url) => LinkKind::External,
        Err(ParseError::RelativeUrlWithoutBase) => LinkKind::Internal,
        // Bad host or port, but the scheme still says it isn't a local path
        Err(_) if SCHEME.is_match(url) => LinkKind::External,
        Err(_) => LinkKind::Internal,
    }
}

fn has_authority(url: &str) -> bool {
    url.strip_prefix("//")
        .and_then(|rest| rest.split(['/', '?', '#']).next())
        .is_some_and(|host| !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_links() {
        for url in [
            "https://example.com",
            "http://example.com",
            "ftp://example.com",
            "mailto:test@example.com",
            "//cdn.example.com/lib.js",
            "https://example.com/{{.Params.slug}}",
            "http://example.com:99999/x",
            "http://",
            "http://256.1.1.1/",
            "https://exa|mple.com/",
        ] {
            assert_eq!(classify(url), LinkKind::External, "{}", url);
        }
    }

    #[test]
    fn test_internal_links() {
        for url in [
            "./relative.html",
            "../parent.html",
            "/absolute.html",
            "page.html",
            "#fragment",
            "",
            "/about/?param=value",
            "{{.Site.BaseURL}}/about",
        ] {
            assert_eq!(classify(url), LinkKind::Internal, "{}", url);
        }
    }

    #[test]
    fn test_bare_double_slash_is_internal() {
        assert_eq!(classify("//"), LinkKind::Internal);
    }
}
