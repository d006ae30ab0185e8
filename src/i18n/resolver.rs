//! Route equivalence: find the page in the other language.
//!
//! Resolution order:
//! 1. resources section (slug table for detail pages, prefix swap otherwise)
//! 2. route table, English → French
//! 3. route table, French → English
//! 4. language root swap (`/x/` ↔ `/fr/x/`)
//!
//! Resolution never fails; an unknown page resolves to its mechanical
//! counterpart even if that page does not exist.

use crate::i18n::path::{to_relative, NormalizedPath, DEFAULT_BASE_PATH};
use crate::i18n::{Language, RouteTables};
use tracing::debug;

/// Which rule produced a resolution target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Resource detail page with a slug found in the slug table
    ResourceSlug,
    /// Resource detail page whose slug is reused as-is
    ResourceSlugPassthrough,
    /// Other page under a resources prefix, prefix replaced
    ResourcePrefix,
    /// Exact English entry of the route table
    Route,
    /// Exact French entry of the route table
    ReverseRoute,
    /// Language root swap
    Fallback,
}

/// Outcome of resolving one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub current: NormalizedPath,
    pub target: NormalizedPath,
    /// `target` relative to `current`, ready for navigation
    pub href: String,
    pub rule: MatchRule,
}

/// Resolver over a set of route tables and a deployment base path.
#[derive(Debug, Clone)]
pub struct RouteResolver<'a> {
    tables: &'a RouteTables,
    base_path: String,
}

impl Default for RouteResolver<'static> {
    fn default() -> Self {
        Self::new(RouteTables::get())
    }
}

impl<'a> RouteResolver<'a> {
    pub fn new(tables: &'a RouteTables) -> Self {
        Self {
            tables,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }

    /// Use a different deployment base path (empty for root hosting).
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn normalize(&self, raw: &str) -> NormalizedPath {
        NormalizedPath::with_base(raw, &self.base_path)
    }

    /// Resolve `raw` to its equivalent page in the other language.
    pub fn resolve(&self, raw: &str) -> Resolution {
        let current = self.normalize(raw);
        let (target, rule) = self.target_for(&current);
        let target = self.normalize(&target);
        let href = to_relative(&current, &target);

        debug!(
            "Resolved {} -> {} ({:?}, href {})",
            current, target, rule, href
        );

        Resolution {
            current,
            target,
            href,
            rule,
        }
    }

    /// Absolute target of `raw`, before relativization.
    pub fn resolve_target(&self, raw: &str) -> NormalizedPath {
        self.resolve(raw).target
    }

    /// Relative URL of the equivalent page, suitable for direct navigation.
    pub fn resolve_equivalent(&self, raw: &str) -> String {
        self.resolve(raw).href
    }

    fn target_for(&self, current: &NormalizedPath) -> (String, MatchRule) {
        if let Some(found) = self.resource_target(current) {
            return found;
        }
        if let Some(fr) = self.tables.routes.get(current.as_str()) {
            return (fr.to_string(), MatchRule::Route);
        }
        if let Some(en) = self.tables.routes.get_reverse(current.as_str()) {
            return (en.to_string(), MatchRule::ReverseRoute);
        }
        (Self::swap_language_root(current), MatchRule::Fallback)
    }

    /// Resources section handling. Checked before the route table so that a
    /// detail page always goes through the slug table.
    fn resource_target(&self, current: &NormalizedPath) -> Option<(String, MatchRule)> {
        let path = current.as_str();
        let en_prefix = self.tables.resources_prefix_en;
        let fr_prefix = self.tables.resources_prefix_fr;
        let slugs = &self.tables.resource_slugs;

        let (rest, to_prefix, to_french) = if let Some(rest) = path.strip_prefix(en_prefix) {
            (rest, fr_prefix, true)
        } else if let Some(rest) = path.strip_prefix(fr_prefix) {
            (rest, en_prefix, false)
        } else {
            return None;
        };

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        match (segments.next(), segments.next()) {
            (Some(slug), None) => {
                let mapped = if to_french {
                    slugs.get(slug)
                } else {
                    slugs.get_reverse(slug)
                };
                Some(match mapped {
                    Some(mapped) => (format!("{to_prefix}{mapped}/"), MatchRule::ResourceSlug),
                    None => (
                        format!("{to_prefix}{slug}/"),
                        MatchRule::ResourceSlugPassthrough,
                    ),
                })
            }
            _ => Some((format!("{to_prefix}{rest}"), MatchRule::ResourcePrefix)),
        }
    }

    /// `/x/` → `/fr/x/` and `/fr/x/` → `/x/`.
    fn swap_language_root(current: &NormalizedPath) -> String {
        let language = Language::of_path(current);
        let rest = current
            .as_str()
            .strip_prefix(language.root_prefix())
            .unwrap_or(current.as_str());

        format!("{}{}", language.counterpart().root_prefix(), rest)
    }
}

/// Resolve with the built-in tables and default base path.
pub fn resolve_equivalent(raw: &str) -> String {
    RouteResolver::default().resolve_equivalent(raw)
}
