// src/error.rs
// =============================================================================
// Typed errors for the operations that can make further work on an input
// meaningless: a page that can't be read, an ignore file that exists but
// can't be read, a content tree that can't be walked.
//
// Broken links are NOT errors. They end up as data on the Link itself
// (status code + error message), see scanner::LinkOutcome.
// =============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("failed to read page {}: {source}", .path.display())]
    ReadPage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read ignore file {}: {source}", .path.display())]
    ReadIgnoreFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to enumerate files in {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to get canonical path for {}: {source}", .path.display())]
    CanonicalPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
