//! Check that pages serve local images and migrated images keep a remote
//! fallback. Exits with status 1 when any rule fails.
//!
//! Optional:
//! - SITE_ROOT (defaults to the current directory)

use anyhow::Result;
use nestego_site::config::site_root;
use nestego_site::qa;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qa_images=info".parse()?),
        )
        .init();

    let report = qa::images::run(&site_root())?;

    if !report.is_ok() {
        eprintln!("Image QA failed:\n{}", report.errors.join("\n"));
        std::process::exit(1);
    }

    println!("Image QA passed across {} HTML files.", report.checked);
    Ok(())
}
