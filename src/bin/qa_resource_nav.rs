//! Check the navigation links of every resource article page, in both
//! languages. Exits with status 1 when any link is missing or misdirected.
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
                .add_directive("qa_resource_nav=info".parse()?),
        )
        .init();

    let report = qa::resource_nav::run(&site_root())?;

    if !report.is_ok() {
        eprintln!("Resource nav QA failed:\n{}", report.errors.join("\n"));
        std::process::exit(1);
    }

    println!(
        "Resource nav QA passed for {} resource detail pages with navigation.",
        report.checked
    );
    Ok(())
}
