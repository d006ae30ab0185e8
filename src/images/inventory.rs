//! Inventory of remotely hosted images and their migration to local assets.

use crate::html::{get_attr, has_attr, img_tags, is_remote_url, set_attr};
use crate::images::manifest::{write_manifest, PlanRow};
use crate::site::{html_pages, relative_file_path};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const REPORT_DIR: &str = "reports";
pub const PLAN_CSV: &str = "reports/image-migration-plan.csv";
pub const PLAN_MD: &str = "reports/image-migration-plan.md";
pub const ASSET_DIR: &str = "assets/images";
pub const REMOTE_FALLBACK_ATTR: &str = "data-remote-fallback";

const SLUG_MAX_CHARS: usize = 60;

/// Asset folder an image is filed under, chosen from the page's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Services,
    Resources,
    CaseStudies,
    Site,
}

impl Section {
    pub fn for_page(rel_path: &str) -> Self {
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| rel_path.starts_with(p));

        if starts(&["services/", "fr/services/"]) {
            Section::Services
        } else if starts(&["resources/", "fr/ressources/"]) {
            Section::Resources
        } else if starts(&["case-studies/", "fr/realisations/"]) {
            Section::CaseStudies
        } else {
            Section::Site
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Services => "services",
            Section::Resources => "resources",
            Section::CaseStudies => "case-studies",
            Section::Site => "site",
        }
    }

    /// File name prefix. Case study images share the generic `site` prefix.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Section::CaseStudies => Section::Site.as_str(),
            other => other.as_str(),
        }
    }
}

/// ASCII, lowercase, dash separated, at most 60 characters.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text).to_ascii_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug.chars().take(SLUG_MAX_CHARS).collect()
}

/// `.png` for PNG URLs, `.jpg` for everything else (WebP sources are
/// re-encoded from the JPEG copy).
pub fn infer_ext(url: &str) -> &'static str {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.path().to_ascii_lowercase().ends_with(".png") => ".png",
        _ => ".jpg",
    }
}

fn url_file_name(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or_default();
    without_query.rsplit('/').next().unwrap_or_default()
}

fn with_webp_ext(path: &str) -> String {
    match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => format!("{}.webp", &path[..dot]),
        _ => format!("{}.webp", path),
    }
}

#[derive(Debug, Clone)]
struct AssetMapping {
    local_path: String,
    webp_path: String,
}

/// Assigns local asset paths to remote image URLs across pages and collects
/// the plan rows.
#[derive(Debug, Default)]
pub struct MigrationPlanner {
    by_url: HashMap<String, AssetMapping>,
    used_names: HashMap<(Section, String), usize>,
    rows: Vec<PlanRow>,
}

impl MigrationPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local path for `url`. The first page that references a URL decides
    /// its name; later references reuse it.
    fn mapping_for(&mut self, url: &str, alt: &str, section: Section) -> AssetMapping {
        if let Some(existing) = self.by_url.get(url) {
            return existing.clone();
        }

        let base = [slugify(alt), slugify(url_file_name(url))]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| "image".to_string());

        let count = self
            .used_names
            .entry((section, base.clone()))
            .and_modify(|n| *n += 1)
            .or_insert(1);

        let name = if *count == 1 {
            format!("{}-{}{}", section.file_prefix(), base, infer_ext(url))
        } else {
            format!(
                "{}-{}-{}{}",
                section.file_prefix(),
                base,
                count,
                infer_ext(url)
            )
        };

        let local_path = format!("{}/{}/{}", ASSET_DIR, section.as_str(), name);
        let mapping = AssetMapping {
            webp_path: with_webp_ext(&local_path),
            local_path,
        };
        self.by_url.insert(url.to_string(), mapping.clone());
        mapping
    }

    /// Record every remote, not yet migrated `<img>` of a page. With
    /// `apply`, returns the rewritten document when anything changed.
    pub fn plan_page(&mut self, rel_path: &str, html: &str, apply: bool) -> Option<String> {
        let section = Section::for_page(rel_path);
        let mut updated = html.to_string();

        for (i, tag) in img_tags(html).into_iter().enumerate() {
            if has_attr(tag, REMOTE_FALLBACK_ATTR) {
                continue;
            }
            let src = match get_attr(tag, "src") {
                Some(src) if !src.is_empty() && is_remote_url(src) => src,
                _ => continue,
            };
            let alt = get_attr(tag, "alt").unwrap_or_default();

            let mapping = self.mapping_for(src, alt, section);
            self.rows.push(PlanRow {
                page_path: rel_path.to_string(),
                selector_context: format!("img:nth-of-type({})", i + 1),
                remote_url: src.to_string(),
                proposed_local_path: mapping.local_path.clone(),
                alt_text: alt.to_string(),
            });

            if apply {
                let local_img = set_attr(
                    &set_attr(tag, "src", &relative_file_path(rel_path, &mapping.local_path)),
                    REMOTE_FALLBACK_ATTR,
                    src,
                );
                let picture = format!(
                    "<picture><source srcset=\"{}\" type=\"image/webp\">{}</picture>",
                    relative_file_path(rel_path, &mapping.webp_path),
                    local_img
                );
                updated = updated.replacen(tag, &picture, 1);
            }
        }

        (apply && updated != html).then_some(updated)
    }

    /// Plan rows sorted by page, then selector.
    pub fn into_rows(mut self) -> Vec<PlanRow> {
        self.rows.sort_by(|a, b| {
            a.page_path
                .cmp(&b.page_path)
                .then_with(|| a.selector_context.cmp(&b.selector_context))
        });
        self.rows
    }
}

/// Markdown rendition of the plan.
pub fn render_markdown(rows: &[PlanRow], generated_at: DateTime<Utc>) -> String {
    let mut lines = vec![
        "# Image Migration Plan".to_string(),
        String::new(),
        format!(
            "Generated: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        String::new(),
        format!("Total remote images found: **{}**", rows.len()),
        String::new(),
        "| Page | Selector | Remote URL | Proposed Local Path | Alt Text |".to_string(),
        "| --- | --- | --- | --- | --- |".to_string(),
    ];
    lines.extend(rows.iter().map(|row| {
        format!(
            "| {} | {} | {} | {} | {} |",
            row.page_path,
            row.selector_context,
            row.remote_url,
            row.proposed_local_path,
            row.alt_text.replace('|', "\\|")
        )
    }));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[derive(Debug)]
pub struct InventoryReport {
    pub rows: Vec<PlanRow>,
    pub pages_scanned: usize,
    pub pages_rewritten: usize,
    pub csv_path: PathBuf,
    pub markdown_path: PathBuf,
}

/// Scan the site, write both plan reports, and with `apply` rewrite pages
/// to serve the local copies.
pub fn run_inventory(root: &Path, apply: bool) -> Result<InventoryReport> {
    let report_dir = root.join(REPORT_DIR);
    fs::create_dir_all(&report_dir)
        .with_context(|| format!("Failed to create {}", report_dir.display()))?;

    let pages = html_pages(root);
    let mut planner = MigrationPlanner::new();
    let mut pages_rewritten = 0;

    for page in &pages {
        let html = fs::read_to_string(&page.path)
            .with_context(|| format!("Failed to read {}", page.path.display()))?;

        if let Some(updated) = planner.plan_page(&page.rel_path, &html, apply) {
            fs::write(&page.path, updated)
                .with_context(|| format!("Failed to write {}", page.path.display()))?;
            debug!("Rewrote {}", page.rel_path);
            pages_rewritten += 1;
        }
    }

    let rows = planner.into_rows();
    let csv_path = root.join(PLAN_CSV);
    let markdown_path = root.join(PLAN_MD);

    write_manifest(&csv_path, &rows)?;
    fs::write(&markdown_path, render_markdown(&rows, Utc::now()))
        .with_context(|| format!("Failed to write {}", markdown_path.display()))?;

    info!(
        "Found {} remote images across {} pages",
        rows.len(),
        pages.len()
    );

    Ok(InventoryReport {
        rows,
        pages_scanned: pages.len(),
        pages_rewritten,
        csv_path,
        markdown_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // ==================== Naming Tests ====================

    #[test]
    fn test_section_for_page() {
        assert_eq!(Section::for_page("services/web-design/index.html"), Section::Services);
        assert_eq!(Section::for_page("fr/ressources/x/index.html"), Section::Resources);
        assert_eq!(Section::for_page("fr/realisations/index.html"), Section::CaseStudies);
        assert_eq!(Section::for_page("index.html"), Section::Site);
        assert_eq!(Section::for_page("fr/a-propos/index.html"), Section::Site);
        assert_eq!(Section::CaseStudies.file_prefix(), "site");
        assert_eq!(Section::CaseStudies.as_str(), "case-studies");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Équipe de Montréal au travail!"), "equipe-de-montreal-au-travail");
        assert_eq!(slugify("  --Hello__World--  "), "hello-world");
        assert_eq!(slugify("photo-1521737604893.jpg"), "photo-1521737604893-jpg");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(&"a".repeat(80)).len(), 60);
    }

    #[test]
    fn test_infer_ext() {
        assert_eq!(infer_ext("https://cdn.example/logo.PNG?v=2"), ".png");
        assert_eq!(infer_ext("https://cdn.example/photo.jpeg"), ".jpg");
        assert_eq!(infer_ext("https://cdn.example/photo.webp"), ".jpg");
        assert_eq!(infer_ext("https://images.example/photo-123?w=800"), ".jpg");
        assert_eq!(infer_ext("//cdn.example/logo.png"), ".jpg");
    }

    #[test]
    fn test_with_webp_ext() {
        assert_eq!(with_webp_ext("assets/images/site/site-a.jpg"), "assets/images/site/site-a.webp");
        assert_eq!(with_webp_ext("assets/images.d/site-a"), "assets/images.d/site-a.webp");
    }

    // ==================== Planner Tests ====================

    #[test]
    fn test_plan_names_and_dedupes() {
        let mut planner = MigrationPlanner::new();
        let html = r#"
            <img src="https://cdn.example/a.jpg" alt="Server room">
            <img src="/assets/images/site/local.jpg" alt="Local">
            <img src="https://cdn.example/b.jpg?w=400" alt="Server room">
            <img src="https://cdn.example/a.jpg" alt="Server room again">
        "#;

        assert_eq!(planner.plan_page("services/index.html", html, false), None);
        let rows = planner.into_rows();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].selector_context, "img:nth-of-type(1)");
        assert_eq!(rows[0].proposed_local_path, "assets/images/services/services-server-room.jpg");
        assert_eq!(rows[1].selector_context, "img:nth-of-type(3)");
        assert_eq!(rows[1].proposed_local_path, "assets/images/services/services-server-room-2.jpg");
        assert_eq!(rows[2].proposed_local_path, rows[0].proposed_local_path);
        assert_eq!(rows[2].alt_text, "Server room again");
    }

    #[test]
    fn test_plan_falls_back_to_file_name_then_image() {
        let mut planner = MigrationPlanner::new();
        let html = r#"<img src="https://cdn.example/x/Team.PNG?w=1"><img src="https://cdn.example/"><img src="//cdn.example/z.png" alt="">"#;
        planner.plan_page("case-studies/acme/index.html", html, false);
        let rows = planner.into_rows();

        assert_eq!(rows[0].proposed_local_path, "assets/images/case-studies/site-team-png.png");
        assert_eq!(rows[1].proposed_local_path, "assets/images/case-studies/site-image.jpg");
        assert_eq!(rows[2].proposed_local_path, "assets/images/case-studies/site-z-png.jpg");
    }

    #[test]
    fn test_plan_skips_migrated_images() {
        let mut planner = MigrationPlanner::new();
        let html = r#"<img src="../assets/images/site/site-a.jpg" data-remote-fallback="https://cdn.example/a.jpg">"#;
        planner.plan_page("about-us/index.html", html, true);
        assert!(planner.into_rows().is_empty());
    }

    #[test]
    fn test_apply_wraps_in_picture() {
        let mut planner = MigrationPlanner::new();
        let html = r#"<p><img src="https://cdn.example/a.jpg" alt="Team"></p>"#;

        let updated = planner
            .plan_page("fr/services/index.html", html, true)
            .expect("page should change");

        assert_eq!(
            updated,
            "<p><picture><source srcset=\"../../assets/images/services/services-team.webp\" type=\"image/webp\">\
             <img data-remote-fallback=\"https://cdn.example/a.jpg\" src=\"../../assets/images/services/services-team.jpg\" alt=\"Team\">\
             </picture></p>"
        );

        // Second pass finds nothing left to migrate
        let mut again = MigrationPlanner::new();
        assert_eq!(again.plan_page("fr/services/index.html", &updated, true), None);
    }

    #[test]
    fn test_rows_sorted_by_page_then_selector() {
        let mut planner = MigrationPlanner::new();
        planner.plan_page("b.html", r#"<img src="https://x/1.jpg">"#, false);
        planner.plan_page("a.html", r#"<img src="https://x/2.jpg"><img src="https://x/3.jpg">"#, false);
        let rows = planner.into_rows();

        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.page_path.as_str(), r.selector_context.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.html", "img:nth-of-type(1)"),
                ("a.html", "img:nth-of-type(2)"),
                ("b.html", "img:nth-of-type(1)"),
            ]
        );
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_render_markdown() {
        let rows = vec![PlanRow {
            page_path: "index.html".to_string(),
            selector_context: "img:nth-of-type(1)".to_string(),
            remote_url: "https://x/a.jpg".to_string(),
            proposed_local_path: "assets/images/site/site-a.jpg".to_string(),
            alt_text: "A | B".to_string(),
        }];
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let md = render_markdown(&rows, at);

        assert!(md.starts_with("# Image Migration Plan\n\nGenerated: 2025-01-02T03:04:05.000Z\n"));
        assert!(md.contains("Total remote images found: **1**"));
        assert!(md.ends_with(
            "| index.html | img:nth-of-type(1) | https://x/a.jpg | assets/images/site/site-a.jpg | A \\| B |\n"
        ));
    }
}
