//! Inventory remote images and plan their migration to local assets.
//!
//! Usage:
//!   cargo run --bin image-inventory            # Write reports/image-migration-plan.{csv,md}
//!   cargo run --bin image-inventory -- --apply # Also rewrite pages to <picture> with local copies
//!
//! Optional:
//! - SITE_ROOT (defaults to the current directory)

use anyhow::Result;
use nestego_site::config::site_root;
use nestego_site::images::run_inventory;
use tracing::info;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("image_inventory=info".parse()?)
                .add_directive("nestego_site=info".parse()?),
        )
        .init();

    let apply = std::env::args().skip(1).any(|a| a == "--apply");
    let root = site_root();

    let report = run_inventory(&root, apply)?;

    info!("Wrote {}", report.csv_path.display());
    info!("Wrote {}", report.markdown_path.display());
    if apply {
        info!(
            "Applied <picture> migration to {} of {} HTML files",
            report.pages_rewritten, report.pages_scanned
        );
    }

    Ok(())
}
