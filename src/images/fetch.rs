use crate::images::manifest::PlanRow;
use crate::retry::{is_transient, with_retry_if, HttpStatusError, RetryConfig};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// What happened to one planned asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAction {
    /// Local copy and its WebP sibling already exist.
    UpToDate,
    /// Local copy exists; only the WebP sibling is missing.
    Kept,
    Downloaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub url: String,
    pub local_path: PathBuf,
    pub action: FetchAction,
}

/// Distinct remote URLs with the first local path planned for each, in
/// manifest order.
pub fn unique_assets(rows: &[PlanRow]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.remote_url.as_str()))
        .map(|row| (row.remote_url.clone(), row.proposed_local_path.clone()))
        .collect()
}

pub fn webp_sibling(path: &Path) -> PathBuf {
    path.with_extension("webp")
}

/// Protocol-relative URLs are fetched over HTTPS.
fn absolute_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// Downloads planned images into the site tree.
pub struct ImageFetcher {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl ImageFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            retry: RetryConfig::image_download(),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed {}", url))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpStatusError {
                service: "Image host",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        Ok(bytes.to_vec())
    }

    /// Download `url` to `dest`, creating parent directories. Redirects are
    /// followed; any final status other than 200 is an error.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let url = absolute_url(url);
        let bytes = with_retry_if(
            &self.retry,
            "Image download",
            || self.get_bytes(&url),
            is_transient,
        )
        .await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(dest, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", dest.display()))?;

        debug!("Wrote {} bytes to {}", bytes.len(), dest.display());
        Ok(())
    }

    /// Fetch every distinct asset of the plan. Assets whose local copy and
    /// WebP sibling both exist are skipped unless `force` is set.
    pub async fn fetch_all(
        &self,
        root: &Path,
        rows: &[PlanRow],
        force: bool,
    ) -> Result<Vec<FetchOutcome>> {
        let mut outcomes = Vec::new();

        for (url, rel_path) in unique_assets(rows) {
            let local_path = root.join(&rel_path);
            let local_exists = local_path.exists();

            let action = if !force && local_exists && webp_sibling(&local_path).exists() {
                FetchAction::UpToDate
            } else if force || !local_exists {
                info!("Downloading {} -> {}", url, rel_path);
                self.download(&url, &local_path).await?;
                FetchAction::Downloaded
            } else {
                FetchAction::Kept
            };

            outcomes.push(FetchOutcome {
                url,
                local_path,
                action,
            });
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(url: &str, local: &str) -> PlanRow {
        PlanRow {
            page_path: "index.html".to_string(),
            selector_context: "img:nth-of-type(1)".to_string(),
            remote_url: url.to_string(),
            proposed_local_path: local.to_string(),
            alt_text: String::new(),
        }
    }

    #[test]
    fn test_unique_assets_first_path_wins() {
        let rows = vec![
            row("https://x/a.jpg", "assets/images/site/site-a.jpg"),
            row("https://x/b.jpg", "assets/images/site/site-b.jpg"),
            row("https://x/a.jpg", "assets/images/services/services-a.jpg"),
        ];

        assert_eq!(
            unique_assets(&rows),
            vec![
                ("https://x/a.jpg".to_string(), "assets/images/site/site-a.jpg".to_string()),
                ("https://x/b.jpg".to_string(), "assets/images/site/site-b.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn test_webp_sibling() {
        assert_eq!(
            webp_sibling(Path::new("assets/images/site/site-a.jpg")),
            PathBuf::from("assets/images/site/site-a.webp")
        );
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("//cdn.example/a.png"), "https://cdn.example/a.png");
        assert_eq!(absolute_url("http://cdn.example/a.png"), "http://cdn.example/a.png");
    }
}
