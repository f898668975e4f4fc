// src/scanner/walk.rs
// =============================================================================
// Finds the pages to scan.
//
// Walks every input path recursively, keeps files with one of the page
// extensions, skips dot-files, and deduplicates by canonical path so a file
// reachable through a symlink (or listed under two inputs) is scanned once.
// =============================================================================

use super::Page;
use crate::error::CheckerError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const PAGE_EXTENSIONS: &[&str] = &[".md", ".html", ".htm"];

// Returns pages sorted by canonical path. When two inputs reach the same
// file, the first one wins.
pub fn enumerate_pages(roots: &[PathBuf], extensions: &[&str]) -> Result<Vec<Page>, CheckerError> {
    let extensions: Vec<String> = extensions.iter().map(|ext| normalize_extension(ext)).collect();
    let mut pages: BTreeMap<PathBuf, Page> = BTreeMap::new();

    for root in roots {
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| CheckerError::Walk {
                path: root.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() || !has_page_extension(path, &extensions) || is_dot_file(path) {
                continue;
            }

            let canonical_path = fs::canonicalize(path).map_err(|source| CheckerError::CanonicalPath {
                path: path.to_path_buf(),
                source,
            })?;

            pages
                .entry(canonical_path.clone())
                .or_insert_with(|| Page::new(path, canonical_path));
        }
    }

    Ok(pages.into_values().collect())
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

fn has_page_extension(path: &Path, extensions: &[String]) -> bool {
    let name = path.to_string_lossy().to_lowercase();
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

fn is_dot_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
