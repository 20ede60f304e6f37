//! SiteCal - calendar selection and sync service
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use sitecal_api::utils::logging::spawn_notice_logger;
use sitecal_api::{router, AppContext};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("SITECAL_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Read .env before the log filter so RUST_LOG can live there too
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = sitecal_infra::config::load().context("failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();

    let ctx = Arc::new(AppContext::new(config).await.context("failed to initialise services")?);
    let _notice_logger = spawn_notice_logger(ctx.notifier.subscribe());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "SiteCal listening");

    axum::serve(listener, router(ctx)).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
