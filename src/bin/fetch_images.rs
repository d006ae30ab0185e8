//! Download the images listed in the migration plan.
//!
//! Usage:
//!   cargo run --bin fetch-images            # Fetch missing assets
//!   cargo run --bin fetch-images -- --force # Re-download everything
//!
//! Reads reports/image-migration-plan.csv under SITE_ROOT (defaults to the
//! current directory). Compression and WebP generation are left to external
//! tooling.

use anyhow::Result;
use nestego_site::config::site_root;
use nestego_site::images::inventory::PLAN_CSV;
use nestego_site::images::{read_manifest, FetchAction, ImageFetcher};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fetch_images=info".parse()?)
                .add_directive("nestego_site=info".parse()?),
        )
        .init();

    let force = std::env::args().skip(1).any(|a| a == "--force");
    let root = site_root();

    let rows = read_manifest(&root.join(PLAN_CSV))?;
    let fetcher = ImageFetcher::new()?;
    let outcomes = fetcher.fetch_all(&root, &rows, force).await?;

    let count = |action: FetchAction| outcomes.iter().filter(|o| o.action == action).count();
    info!(
        "Done: {} downloaded, {} already present, {} up to date",
        count(FetchAction::Downloaded),
        count(FetchAction::Kept),
        count(FetchAction::UpToDate)
    );
    info!("Compression and WebP generation skipped");

    Ok(())
}
