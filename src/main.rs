//! Catalog Aggregator — Binary Entrypoint
//! Loads settings, boots tracing and serves the Axum router on `PORT`.

use anyhow::Context;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use catalog_aggregator::Settings;

/// Compact logs by default, JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_aggregator=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let settings = Settings::load()?;
    if settings.api_secret.is_none() {
        tracing::warn!("API_SECRET is not set; vendor services will reject catalog requests");
    }
    tracing::info!(
        vendor_a = %settings.vendor_a_url,
        vendor_b = %settings.vendor_b_url,
        vendor_c = %settings.vendor_c_url,
        timeout_ms = settings.source_timeout_ms,
        "catalog sources configured"
    );

    let app = catalog_aggregator::app(&settings)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "integrator running");

    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}
