//! Print the cross-language equivalent of one or more site paths.
//!
//! Usage:
//!   cargo run --bin resolve-route -- /services/web-design/ /fr/ressources/
//!   cargo run --bin resolve-route -- --base /nestego-site /nestego-site/contact/
//!
//! Each path is printed with its normalized form, the equivalent page and
//! the relative URL the language toggle would navigate to.

use anyhow::{bail, Result};
use nestego_site::i18n::path::DEFAULT_BASE_PATH;
use nestego_site::i18n::RouteResolver;

fn print_usage() {
    eprintln!("Usage: resolve-route [--base <path>] <path>...");
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("resolve_route=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let mut base_path = DEFAULT_BASE_PATH.to_string();
    let mut paths = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base" => match args.next() {
                Some(base) => base_path = base,
                None => bail!("--base requires a value"),
            },
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            _ => paths.push(arg),
        }
    }

    if paths.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let resolver = RouteResolver::default().with_base_path(base_path);
    for raw in &paths {
        let resolution = resolver.resolve(raw);
        println!(
            "{}\t{} -> {}\t{}\t({:?})",
            raw, resolution.current, resolution.target, resolution.href, resolution.rule
        );
    }

    Ok(())
}
