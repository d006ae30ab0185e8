//! Navigation check for resource article pages.
//!
//! Article pages sit two levels deep, so their relative navigation links are
//! easy to get wrong. Every article that carries the desktop and mobile
//! navigation must link back to the resources listing and to the other
//! top-level pages of its language.

use crate::i18n::{Language, RouteResolver};
use crate::qa::QaReport;
use crate::site::resolve_link;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const DESKTOP_NAV_START: &str = "<nav class=\"nav\"";
const MOBILE_NAV_START: &str = "<nav class=\"mobile-nav\"";
const NAV_END: &str = "</nav>";

/// English top-level pages every article must link to.
const TOP_LEVEL_PAGES: &[&str] = &["/", "/about-us/", "/case-studies/", "/contact/"];
const RESOURCES_LISTING: &str = "/resources/";

static DESKTOP_LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static MOBILE_LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static SPACE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Expected navigation of the article pages of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavExpectation {
    /// Root-relative directory holding one folder per article.
    pub base_dir: String,
    /// Visible text of the link to the listing.
    pub label: &'static str,
    pub listing_path: String,
    pub other_paths: Vec<String>,
}

impl NavExpectation {
    /// Expectations for `language`, with French paths taken from the route
    /// tables.
    pub fn for_language(language: Language, resolver: &RouteResolver) -> Self {
        let localize = |path: &str| {
            if language.is_canonical() {
                path.to_string()
            } else {
                resolver.resolve_target(path).into_string()
            }
        };

        let listing_path = localize(RESOURCES_LISTING);
        Self {
            base_dir: listing_path.trim_matches('/').to_string(),
            label: if language.is_canonical() {
                "Resources"
            } else {
                "Ressources"
            },
            other_paths: TOP_LEVEL_PAGES.iter().map(|&p| localize(p)).collect(),
            listing_path,
        }
    }

    pub fn all() -> Vec<Self> {
        let resolver = RouteResolver::default();
        [Language::ENGLISH, Language::FRENCH]
            .into_iter()
            .map(|language| Self::for_language(language, &resolver))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavAnchor {
    pub href: String,
    pub text: String,
}

/// The text from `start` up to the next `end`, or to the end of the
/// document. Empty when `start` is absent.
pub fn section_between<'a>(html: &'a str, start: &str, end: &str) -> &'a str {
    let Some(from) = html.find(start) else {
        return "";
    };
    match html[from..].find(end) {
        Some(len) => &html[from..from + len],
        None => &html[from..],
    }
}

/// The two navigation blocks of an article page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMenu {
    Desktop,
    Mobile,
}

impl NavMenu {
    pub fn start_marker(&self) -> &'static str {
        match self {
            NavMenu::Desktop => DESKTOP_NAV_START,
            NavMenu::Mobile => MOBILE_NAV_START,
        }
    }

    pub fn scope(&self) -> &'static str {
        match self {
            NavMenu::Desktop => "desktop nav",
            NavMenu::Mobile => "mobile nav",
        }
    }

    /// Anchors whose class list contains `nav-link` or `mobile-nav-link`.
    fn link_regex(&self) -> &'static Regex {
        match self {
            NavMenu::Desktop => DESKTOP_LINK_REGEX.get_or_init(|| {
                Regex::new(r#"(?is)<a\s+href="([^"]+)"\s+class="[^"]*nav-link[^"]*"[^>]*>(.*?)</a>"#)
                    .unwrap()
            }),
            NavMenu::Mobile => MOBILE_LINK_REGEX.get_or_init(|| {
                Regex::new(
                    r#"(?is)<a\s+href="([^"]+)"\s+class="[^"]*mobile-nav-link[^"]*"[^>]*>(.*?)</a>"#,
                )
                .unwrap()
            }),
        }
    }
}

/// Links of one navigation block, with their visible text stripped of
/// markup and whitespace runs.
pub fn parse_links(section: &str, menu: NavMenu) -> Vec<NavAnchor> {
    let link_regex = menu.link_regex();
    let tag_regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    let space_regex = SPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());

    link_regex
        .captures_iter(section)
        .map(|caps| {
            let text = tag_regex.replace_all(&caps[2], "");
            NavAnchor {
                href: caps[1].to_string(),
                text: space_regex.replace_all(&text, " ").trim().to_string(),
            }
        })
        .collect()
}

fn check_label(
    rel_path: &str,
    links: &[NavAnchor],
    expect: &NavExpectation,
    scope: &str,
    errors: &mut Vec<String>,
) {
    let Some(link) = links.iter().find(|l| l.text == expect.label) else {
        errors.push(format!(
            "{}: missing {} link label \"{}\"",
            rel_path, scope, expect.label
        ));
        return;
    };

    let resolved = resolve_link(rel_path, &link.href);
    if resolved != expect.listing_path {
        errors.push(format!(
            "{}: {} link \"{}\" resolves to {} (expected {})",
            rel_path, scope, expect.label, resolved, expect.listing_path
        ));
    }
}

fn check_targets(
    rel_path: &str,
    links: &[NavAnchor],
    expect: &NavExpectation,
    scope: &str,
    errors: &mut Vec<String>,
) {
    let resolved: HashSet<String> = links
        .iter()
        .map(|l| resolve_link(rel_path, &l.href))
        .collect();

    for path in &expect.other_paths {
        if !resolved.contains(path) {
            errors.push(format!(
                "{}: missing {} link resolving to {}",
                rel_path, scope, path
            ));
        }
    }
}

/// Check one article page. Returns `None` when the page does not carry both
/// navigation blocks.
pub fn check_page(rel_path: &str, html: &str, expect: &NavExpectation) -> Option<Vec<String>> {
    if !html.contains(DESKTOP_NAV_START) || !html.contains(MOBILE_NAV_START) {
        return None;
    }

    let menus = [NavMenu::Desktop, NavMenu::Mobile].map(|menu| {
        let section = section_between(html, menu.start_marker(), NAV_END);
        (menu, parse_links(section, menu))
    });

    let mut errors = Vec::new();
    for (menu, links) in &menus {
        check_label(rel_path, links, expect, menu.scope(), &mut errors);
    }
    for (menu, links) in &menus {
        check_targets(rel_path, links, expect, menu.scope(), &mut errors);
    }
    Some(errors)
}

/// `{base_dir}/{article}/index.html` for every article folder that has one.
pub fn article_pages(root: &Path, base_dir: &str) -> Result<Vec<String>> {
    let dir = root.join(base_dir);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut pages = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if entry.path().join("index.html").is_file() {
            pages.push(format!(
                "{}/{}/index.html",
                base_dir,
                entry.file_name().to_string_lossy()
            ));
        }
    }
    pages.sort();
    Ok(pages)
}

pub fn run(root: &Path) -> Result<QaReport> {
    let mut report = QaReport::default();

    for expect in NavExpectation::all() {
        for rel_path in article_pages(root, &expect.base_dir)? {
            let path = root.join(&rel_path);
            let html = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            if let Some(errors) = check_page(&rel_path, &html, &expect) {
                report.errors.extend(errors);
                report.checked += 1;
            }
        }
    }

    Ok(report)
}
