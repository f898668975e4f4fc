// src/checker/resolve.rs
// =============================================================================
// Resolves internal links against the site's directory layout.
//
// A static site has several places a URL can come from:
//
//   content/   authored pages   /about/  -> content/about.md
//                                         -> content/about/index.md
//                                         -> content/about/_index.md (list page)
//   static/    assets           /img/a.png -> static/img/a.png
//   public/    built output     /about/  -> public/about/index.html
//
// candidate_paths() turns a link path into the ordered list of files that
// could satisfy it. It is a pure function; all filesystem access goes through
// the PathProbe trait so tests can use an in-memory tree.
// =============================================================================

use crate::scanner::LinkOutcome;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Which tree internal links are checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteLayout {
    /// The authored source tree (content/ and static/)
    #[default]
    Source,
    /// The generated output tree (public/)
    Built,
}

// Answers "is there a file at this path?" for the resolver. Directories
// don't count; section URLs resolve through their index page candidates.
pub trait PathProbe {
    fn is_file(&self, path: &Path) -> bool;

    // Looks in the parent directory for a file whose name matches the
    // final component ignoring case.
    fn find_case_insensitive(&self, path: &Path) -> Option<PathBuf>;
}

/// PathProbe backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn find_case_insensitive(&self, path: &Path) -> Option<PathBuf> {
        let parent = path.parent()?;
        let wanted = path.file_name()?.to_str()?.to_lowercase();

        // Sorted so the first match is the same on every filesystem
        let mut names: Vec<_> = fs::read_dir(parent)
            .ok()?
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name())
            .collect();
        names.sort();

        names
            .into_iter()
            .find(|name| name.to_str().is_some_and(|n| n.to_lowercase() == wanted))
            .map(|name| parent.join(name))
    }
}

/// What the resolver found for one link
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub found: bool,
    /// Every candidate tested, in order (only filled in verbose mode)
    pub checked: Vec<PathBuf>,
}

pub struct InternalResolver<P = FsProbe> {
    roots: Vec<PathBuf>,
    layout: SiteLayout,
    verbose: bool,
    probe: P,
}

impl InternalResolver<FsProbe> {
    pub fn new(site_root: &Path, layout: SiteLayout, verbose: bool) -> Self {
        Self::with_probe(site_root, layout, verbose, FsProbe)
    }
}

impl<P: PathProbe> InternalResolver<P> {
    pub fn with_probe(site_root: &Path, layout: SiteLayout, verbose: bool, probe: P) -> Self {
        InternalResolver {
            roots: site_roots(site_root),
            layout,
            verbose,
            probe,
        }
    }

    // Tests candidates in order: exact name first, then (for source
    // documents) a case-insensitive match in the same directory.
    pub fn resolve(&self, link_url: &str) -> Resolution {
        let link_path = strip_fragment_and_query(link_url);
        if link_path.is_empty() {
            // Pure fragment or query: the browser never fetches a file
            return Resolution {
                found: true,
                checked: Vec::new(),
            };
        }

        let mut checked = Vec::new();
        for candidate in candidate_paths(link_path, &self.roots, self.layout) {
            if self.verbose {
                checked.push(candidate.clone());
            }

            if self.probe.is_file(&candidate) {
                debug!("{} resolved to {}", link_url, candidate.display());
                return Resolution { found: true, checked };
            }

            if is_source_document(&candidate) {
                if let Some(hit) = self.probe.find_case_insensitive(&candidate) {
                    debug!("{} resolved case-insensitively to {}", link_url, hit.display());
                    if self.verbose {
                        checked.push(hit);
                    }
                    return Resolution { found: true, checked };
                }
            }
        }

        Resolution {
            found: false,
            checked,
        }
    }

    pub fn check(&self, link_url: &str) -> LinkOutcome {
        let resolution = self.resolve(link_url);
        if resolution.found {
            return LinkOutcome::valid();
        }

        if self.verbose && !resolution.checked.is_empty() {
            let paths: Vec<String> = resolution
                .checked
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            LinkOutcome::not_found(format!("file not found; checked: {}", paths.join(", ")))
        } else {
            LinkOutcome::not_found("file not found")
        }
    }
}

// Drops "#fragment" and "?query" from a link
pub fn strip_fragment_and_query(url: &str) -> &str {
    let end = url.find(['#', '?']).unwrap_or(url.len());
    &url[..end]
}

// The configured root, plus the site root above it when the configured root
// sits inside a "content" directory (e.g. --root site/content/posts).
pub fn site_roots(root: &Path) -> Vec<PathBuf> {
    let mut roots = vec![root.to_path_buf()];

    let components: Vec<Component> = root.components().collect();
    if let Some(pos) = components.iter().rposition(|c| c.as_os_str() == "content") {
        let mut site_root: PathBuf = components[..pos].iter().collect();
        if site_root.as_os_str().is_empty() {
            site_root = PathBuf::from(".");
        }
        if site_root != root {
            roots.push(site_root);
        }
    }

    roots
}

// Ordered, deduplicated list of files that could satisfy `link_path`.
pub fn candidate_paths(link_path: &str, roots: &[PathBuf], layout: SiteLayout) -> Vec<PathBuf> {
    let relative = link_path.trim_start_matches('/');
    let base = relative.trim_end_matches('/');
    let section_like = relative.is_empty() || relative.ends_with('/');
    let extensionless = Path::new(base).extension().is_none();
    let wants_index = section_like || extensionless;

    let mut candidates = Vec::new();
    for root in roots {
        match layout {
            SiteLayout::Source => {
                candidates.push(root.join(relative));
                candidates.push(root.join("static").join(relative));
                candidates.push(root.join("content").join(relative));
                if wants_index {
                    // Also directly under the root, for roots that already
                    // point inside content/
                    push_page_variants(&mut candidates, &root.join("content"), base);
                    push_page_variants(&mut candidates, root, base);
                }
            }
            SiteLayout::Built => {
                let public = root.join("public");
                candidates.push(public.join(relative));
                if wants_index {
                    candidates.push(public.join(base).join("index.html"));
                    if !base.is_empty() {
                        candidates.push(with_suffix(public.join(base), ".html"));
                    }
                }
            }
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|candidate| seen.insert(candidate.clone()));
    candidates
}

// <dir>/<base>.md, <dir>/<base>/index.md, <dir>/<base>/_index.md
fn push_page_variants(candidates: &mut Vec<PathBuf>, dir: &Path, base: &str) {
    if !base.is_empty() {
        candidates.push(with_suffix(dir.join(base), ".md"));
    }
    candidates.push(dir.join(base).join("index.md"));
    candidates.push(dir.join(base).join("_index.md"));
}

fn with_suffix(path: PathBuf, suffix: &str) -> PathBuf {
    let mut path = path.into_os_string();
    path.push(suffix);
    PathBuf::from(path)
}

fn is_source_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["md", "markdown", "html", "htm"]
                .iter()
                .any(|doc| ext.eq_ignore_ascii_case(doc))
        })
}
