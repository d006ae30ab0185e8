use crate::html::{attrs, img_tags, is_http_url};
use crate::images::inventory::REMOTE_FALLBACK_ATTR;
use crate::qa::QaReport;
use crate::site::{html_pages, resolve_file_ref};
use anyhow::{Context, Result};
use std::path::Path;

/// Image rules for one page. Only migrated images (those carrying a remote
/// fallback) are held to the local asset layout.
pub fn check_page(rel_path: &str, html: &str) -> Vec<String> {
    let mut errors = Vec::new();

    for tag in img_tags(html) {
        let attrs = attrs(tag);
        let src = attrs.get("src").map(String::as_str).unwrap_or_default();
        let fallback = attrs
            .get(REMOTE_FALLBACK_ATTR)
            .map(String::as_str)
            .unwrap_or_default();

        if is_http_url(src) {
            errors.push(format!("{}: remote src not allowed -> {}", rel_path, src));
        }
        if !fallback.is_empty() && !is_http_url(fallback) {
            errors.push(format!(
                "{}: data-remote-fallback must be remote URL -> {}",
                rel_path, fallback
            ));
        }
        if fallback.is_empty() || src.is_empty() {
            continue;
        }

        if !is_http_url(src) && !src.contains("assets/images/") {
            errors.push(format!(
                "{}: migrated image src must be under assets/images -> {}",
                rel_path, src
            ));
        }
        if !resolve_file_ref(rel_path, src).contains("/assets/images/") {
            errors.push(format!(
                "{}: relative path resolves outside assets/images -> {}",
                rel_path, src
            ));
        }
    }

    errors
}

pub fn run(root: &Path) -> Result<QaReport> {
    let pages = html_pages(root);
    let mut report = QaReport {
        checked: pages.len(),
        errors: Vec::new(),
    };

    for page in &pages {
        let html = std::fs::read_to_string(&page.path)
            .with_context(|| format!("Failed to read {}", page.path.display()))?;
        report.errors.extend(check_page(&page.rel_path, &html));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_page_passes() {
        let html = r#"
            <img src="assets/images/site/site-logo.png" alt="Logo">
            <picture><source srcset="../assets/images/site/site-a.webp" type="image/webp"><img data-remote-fallback="https://cdn.example/a.jpg" src="../assets/images/site/site-a.jpg"></picture>
            <img src="/favicon.png">
        "#;
        assert!(check_page("about-us/index.html", html).is_empty());
    }

    #[test]
    fn test_remote_src_is_error() {
        let errors = check_page("index.html", r#"<img src="https://cdn.example/a.jpg">"#);
        assert_eq!(
            errors,
            vec!["index.html: remote src not allowed -> https://cdn.example/a.jpg"]
        );
    }

    #[test]
    fn test_fallback_must_be_remote() {
        let errors = check_page(
            "index.html",
            r#"<img src="assets/images/site/a.jpg" data-remote-fallback="/a.jpg">"#,
        );
        assert_eq!(
            errors,
            vec!["index.html: data-remote-fallback must be remote URL -> /a.jpg"]
        );
    }

    #[test]
    fn test_migrated_src_outside_assets() {
        let errors = check_page(
            "services/index.html",
            r#"<img src="../img/a.jpg" data-remote-fallback="https://cdn.example/a.jpg">"#,
        );
        assert_eq!(
            errors,
            vec![
                "services/index.html: migrated image src must be under assets/images -> ../img/a.jpg",
                "services/index.html: relative path resolves outside assets/images -> ../img/a.jpg",
            ]
        );
    }

    #[test]
    fn test_similar_directory_name_is_not_assets() {
        let errors = check_page(
            "index.html",
            r#"<img src="assets/images-old/a.jpg" data-remote-fallback="https://cdn.example/a.jpg">"#,
        );
        assert_eq!(errors.len(), 2);
    }
}
