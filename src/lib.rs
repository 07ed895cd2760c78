// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{CatalogAggregator, CatalogReport};
pub use crate::api::{router, AppState};
pub use crate::catalog::{CatalogEntry, CatalogResponse, SourceBatch, SourceKind};
pub use crate::config::Settings;
pub use crate::error::CatalogError;

use axum::Router;
use tracing::info;

/// Build the full HTTP app for the given settings: catalog routes talking to
/// the configured vendor URLs, plus `/metrics` when enabled.
pub fn app(settings: &Settings) -> anyhow::Result<Router> {
    let aggregator = CatalogAggregator::from_settings(settings);
    let mut router = api::router(AppState::new(aggregator));

    if settings.metrics_enabled {
        let m = metrics::Metrics::init()?;
        router = router.merge(m.router());
        info!("metrics exposed at /metrics");
    }

    Ok(router)
}
