// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Falls back to GET only when HEAD fails at the transport level
//   (a 404 or 405 to HEAD is already an answer, so we keep it)
// - Every response is an outcome: the status code is recorded as-is and
//   codes >= 400 get an "HTTP <code>" error message
// - Transport failures (DNS, refused connection, timeout) become status 0
//   with a description of what went wrong
//
// Nothing in here returns an error for a bad link. One unreachable host
// must never stop the rest of the batch.
// =============================================================================

use crate::error::CheckerError;
use crate::scanner::LinkOutcome;
use log::debug;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpProbe {
    // Client is cheap to clone (it's an Arc internally) and pools connections
    client: Client,
}

impl HttpProbe {
    // Builds a probe whose every request is bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self, CheckerError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(HttpProbe { client })
    }

    // Probes one URL: HEAD first, then GET if HEAD couldn't get an answer
    pub async fn probe(&self, url: &str) -> LinkOutcome {
        let response = match self.client.head(url).send().await {
            Ok(response) => Ok(response),
            Err(e) => {
                debug!("HEAD {} failed ({}), retrying with GET", url, e);
                self.client.get(url).send().await
            }
        };

        match response {
            Ok(response) => LinkOutcome::http(response.status().as_u16()),
            Err(e) => {
                debug!("GET {} failed: {}", url, e);
                LinkOutcome::failed(describe_error(&e))
            }
        }
    }
}

// Turns a reqwest transport error into a short, readable message.
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - A URL reqwest refuses to even build a request for
fn describe_error(error: &reqwest::Error) -> String {
    let error_string = error.to_string();
    // The useful detail (e.g. "dns error: ...") is usually in the source chain
    let detail = std::error::Error::source(error)
        .map(|source| source.to_string())
        .unwrap_or_else(|| error_string.clone());

    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        if detail.to_lowercase().contains("dns") {
            format!("could not resolve hostname: {}", detail)
        } else {
            format!("connection failed: {}", detail)
        }
    } else if error.is_builder() {
        format!("invalid URL: {}", detail)
    } else {
        error_string
    }
}
