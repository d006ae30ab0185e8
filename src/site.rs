//! Static site tree: page discovery and page-relative path arithmetic.

use crate::i18n::path::collapse_dot_segments;
use crate::i18n::NormalizedPath;
use jwalk::WalkDir;
use std::path::{Path, PathBuf};

/// Directories never scanned for pages.
pub const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// An HTML page under the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePage {
    pub path: PathBuf,
    /// Path relative to the site root with `/` separators, e.g. `fr/contact/index.html`.
    pub rel_path: String,
}

impl SitePage {
    /// Web directory containing the page, e.g. `/fr/contact/`.
    pub fn web_dir(&self) -> NormalizedPath {
        web_dir(&self.rel_path)
    }
}

pub fn is_html_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}

/// Every HTML page under `root`, sorted by relative path.
pub fn html_pages(root: &Path) -> Vec<SitePage> {
    let mut pages: Vec<SitePage> = WalkDir::new(root)
        .skip_hidden(false)
        .process_read_dir(|_depth, _path, _state, children| {
            children.retain(|entry| {
                entry
                    .as_ref()
                    .map(|e| {
                        !(e.file_type().is_dir()
                            && e.file_name()
                                .to_str()
                                .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
                    })
                    .unwrap_or(true)
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().is_some_and(is_html_file))
        .map(|e| {
            let path = e.path();
            SitePage {
                rel_path: rel_path(root, &path),
                path,
            }
        })
        .collect();

    pages.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    pages
}

/// `path` relative to `root`, joined with `/`.
pub fn rel_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Web directory of a root-relative file path.
pub fn web_dir(rel_file: &str) -> NormalizedPath {
    match rel_file.rsplit_once('/') {
        Some((dir, _)) => NormalizedPath::root().join(dir),
        None => NormalizedPath::root(),
    }
}

/// Path of root-relative file `target` as seen from the page at `from_page`.
pub fn relative_file_path(from_page: &str, target: &str) -> String {
    let from_dir = web_dir(from_page);
    let from: Vec<&str> = from_dir.segments().collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let shared = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from.len() - shared];
    parts.extend_from_slice(&to[shared..]);

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Resolve a file reference (such as an image `src`) from the page at
/// `rel_file` to an absolute web path.
pub fn resolve_file_ref(rel_file: &str, reference: &str) -> String {
    collapse_dot_segments(&format!("{}{}", web_dir(rel_file), reference))
}

/// Resolve a navigation `href` from the page at `rel_file` to a directory
/// path ending in `/`. Fragments, absolute URLs, `mailto:` and `tel:` links
/// are returned unchanged.
pub fn resolve_link(rel_file: &str, href: &str) -> String {
    let untouched = href.is_empty()
        || href.starts_with('#')
        || crate::html::is_http_url(href)
        || href.starts_with("mailto:")
        || href.starts_with("tel:");
    if untouched {
        return href.to_string();
    }
    web_dir(rel_file).join(href).into_string()
}
