//! Web path normalization and relative URL construction.
//!
//! Pages can be served from a sub-path (GitHub Pages hosts the site under
//! `/nestego-site`), so every lookup works on a [`NormalizedPath`] with the
//! deployment prefix removed, and every navigation target is emitted relative
//! to the current document instead of as an absolute path.

use std::fmt;

/// Deployment base path used when the site is hosted under the repository name.
pub const DEFAULT_BASE_PATH: &str = "/nestego-site";

/// A web path that starts and ends with `/` and carries no deployment prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// The site root, `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Normalize `raw`, stripping `base_path` when it prefixes a whole segment.
    ///
    /// Total: any input, including the empty string, yields a valid path.
    pub fn with_base(raw: &str, base_path: &str) -> Self {
        let mut path = strip_base_path(raw, base_path).to_string();

        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }

        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Resolve `href` against this path, treated as a directory.
    ///
    /// Absolute hrefs replace the path. `.` and `..` segments are collapsed
    /// and `..` never climbs above the root. Query strings and fragments are
    /// ignored.
    pub fn join(&self, href: &str) -> NormalizedPath {
        let href = href
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let combined = if href.starts_with('/') {
            href.to_string()
        } else {
            format!("{}{}", self.0, href)
        };

        let mut collapsed = collapse_dot_segments(&combined);
        if !collapsed.ends_with('/') {
            collapsed.push('/');
        }
        NormalizedPath(collapsed)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormalizedPath {
    fn from(raw: &str) -> Self {
        normalize(raw)
    }
}

/// Normalize a raw path using the default deployment base path.
pub fn normalize(raw: &str) -> NormalizedPath {
    NormalizedPath::with_base(raw, DEFAULT_BASE_PATH)
}

/// Build the URL of `to` relative to the document at `from`.
///
/// One `..` is emitted for every segment of `from` past the common prefix,
/// followed by the rest of `to`. Identical paths give `./`.
pub fn to_relative(from: &NormalizedPath, to: &NormalizedPath) -> String {
    let from_segments: Vec<&str> = from.segments().collect();
    let to_segments: Vec<&str> = to.segments().collect();

    let shared = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative: Vec<&str> = vec![".."; from_segments.len() - shared];
    relative.extend_from_slice(&to_segments[shared..]);

    if relative.is_empty() {
        "./".to_string()
    } else {
        format!("{}/", relative.join("/"))
    }
}

/// Collapse `.` and `..` segments of an absolute path.
///
/// The result always starts with `/`; a trailing slash is kept when the input
/// had one.
pub fn collapse_dot_segments(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    let trailing = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");
    let mut out = format!("/{}", stack.join("/"));
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}

fn strip_base_path<'a>(raw: &'a str, base_path: &str) -> &'a str {
    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        return raw;
    }

    match raw.strip_prefix(base) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(raw: &str) -> NormalizedPath {
        normalize(raw)
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_empty_is_root() {
        assert_eq!(p("").as_str(), "/");
        assert!(p("").is_root());
    }

    #[test]
    fn test_normalize_adds_slashes() {
        assert_eq!(p("path").as_str(), "/path/");
        assert_eq!(p("/path").as_str(), "/path/");
        assert_eq!(p("path/").as_str(), "/path/");
        assert_eq!(p("/services/web-design/").as_str(), "/services/web-design/");
    }

    #[test]
    fn test_normalize_strips_base_path() {
        assert_eq!(p("/nestego-site/about-us").as_str(), "/about-us/");
        assert_eq!(p("/nestego-site/").as_str(), "/");
        assert_eq!(p("/nestego-site").as_str(), "/");
        assert_eq!(p("/nestego-site/fr/contact/").as_str(), "/fr/contact/");
    }

    #[test]
    fn test_normalize_requires_whole_segment_for_base_path() {
        assert_eq!(p("/nestego-site-other/").as_str(), "/nestego-site-other/");
        assert_eq!(p("/nestego-site-extra").as_str(), "/nestego-site-extra/");
        assert_eq!(p("/nestego-sites/x/").as_str(), "/nestego-sites/x/");
    }

    #[test]
    fn test_normalize_base_path_only_at_start() {
        assert_eq!(p("/docs/nestego-site/").as_str(), "/docs/nestego-site/");
    }

    #[test]
    fn test_with_custom_base_path() {
        let path = NormalizedPath::with_base("/preview/fr/contact", "/preview/");
        assert_eq!(path.as_str(), "/fr/contact/");

        let untouched = NormalizedPath::with_base("/nestego-site/contact", "");
        assert_eq!(untouched.as_str(), "/nestego-site/contact/");
    }

    #[test]
    fn test_segments() {
        let page = p("/fr/services/conception-web/");
        let segments: Vec<_> = page.segments().collect();
        assert_eq!(segments, vec!["fr", "services", "conception-web"]);
        assert_eq!(p("/").segments().count(), 0);
    }

    // ==================== Relative Path Tests ====================

    #[test]
    fn test_to_relative_sibling() {
        assert_eq!(to_relative(&p("/a/b/"), &p("/a/c/")), "../c/");
    }

    #[test]
    fn test_to_relative_same_path() {
        assert_eq!(to_relative(&p("/a/b/"), &p("/a/b/")), "./");
        assert_eq!(to_relative(&p("/"), &p("/")), "./");
    }

    #[test]
    fn test_to_relative_from_root() {
        assert_eq!(to_relative(&p("/"), &p("/fr/")), "fr/");
    }

    #[test]
    fn test_to_relative_to_root() {
        assert_eq!(to_relative(&p("/fr/"), &p("/")), "../");
        assert_eq!(to_relative(&p("/fr/a-propos/"), &p("/about-us/")), "../../about-us/");
    }

    #[test]
    fn test_to_relative_compares_positionally() {
        // "b" appears in both but not at the same position
        assert_eq!(to_relative(&p("/a/b/"), &p("/b/a/")), "../../b/a/");
    }

    // ==================== Join Tests ====================

    #[test]
    fn test_join_relative() {
        assert_eq!(p("/a/b/").join("../c/").as_str(), "/a/c/");
        assert_eq!(p("/a/b/").join("./").as_str(), "/a/b/");
        assert_eq!(p("/").join("fr/").as_str(), "/fr/");
    }

    #[test]
    fn test_join_absolute_and_clamped() {
        assert_eq!(p("/a/b/").join("/contact").as_str(), "/contact/");
        assert_eq!(p("/a/").join("../../../x/").as_str(), "/x/");
    }

    #[test]
    fn test_join_ignores_query_and_fragment() {
        assert_eq!(p("/a/").join("b/?ref=nav#top").as_str(), "/a/b/");
    }

    #[test]
    fn test_collapse_dot_segments() {
        assert_eq!(collapse_dot_segments("/a/./b/../c"), "/a/c");
        assert_eq!(collapse_dot_segments("/a/b/.."), "/a/");
        assert_eq!(collapse_dot_segments("/.."), "/");
        assert_eq!(
            collapse_dot_segments("/resources/x/../../assets/images/a.jpg"),
            "/assets/images/a.jpg"
        );
    }

    // ==================== Property Tests ====================

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9-]{0,8}"
    }

    proptest! {
        #[test]
        fn prop_normalize_is_bracketed_by_slashes(raw in ".{0,40}") {
            let path = normalize(&raw);
            prop_assert!(path.as_str().starts_with('/'));
            prop_assert!(path.as_str().ends_with('/'));
        }

        #[test]
        fn prop_normalize_is_stable_without_base_path(raw in "[a-z/-]{0,30}") {
            prop_assume!(!raw.contains("nestego-site"));
            let once = normalize(&raw);
            prop_assert_eq!(normalize(once.as_str()), once);
        }

        #[test]
        fn prop_join_inverts_to_relative(
            from in prop::collection::vec(segment(), 0..4),
            to in prop::collection::vec(segment(), 0..4),
        ) {
            prop_assume!(from.first().map(|s| s.as_str()) != Some("nestego-site"));
            prop_assume!(to.first().map(|s| s.as_str()) != Some("nestego-site"));
            let from = normalize(&from.join("/"));
            let to = normalize(&to.join("/"));
            let relative = to_relative(&from, &to);
            prop_assert!(!relative.starts_with('/'));
            prop_assert_eq!(from.join(&relative), to);
        }
    }
}
