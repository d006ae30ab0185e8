use anyhow::{Context, Result};
use nestego_site::config::Config;
use nestego_site::contact::{self, AppState, RelayMailer, TurnstileVerifier};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nestego_site=info".parse()?),
        )
        .init();

    info!("Starting Nestego contact service");

    // Load configuration from environment
    let config = Config::from_env()?;
    info!(
        "Accepting cross-origin submissions from {} origins",
        config.allowed_origins.len()
    );

    let verifier = TurnstileVerifier::from_config(&config)?;
    let mailer = RelayMailer::from_config(&config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, Arc::new(verifier), Arc::new(mailer));
    let app = contact::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
