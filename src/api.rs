use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::aggregate::CatalogAggregator;
use crate::error::CatalogError;

pub const READY_TEXT: &str = "System Ready. Access /api/catalog";
pub const HEADER_DEGRADED: &str = "x-catalog-degraded";
pub const HEADER_FAILED_SOURCES: &str = "x-catalog-failed-sources";

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<CatalogAggregator>,
}

impl AppState {
    pub fn new(aggregator: CatalogAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { READY_TEXT }))
        .route("/health", get(|| async { "ok" }))
        .route("/api/catalog", get(catalog))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn catalog(State(state): State<AppState>) -> Result<impl IntoResponse, CatalogError> {
    let report = state.aggregator.build().await?;

    let mut headers = HeaderMap::new();
    let degraded = if report.is_degraded() { "1" } else { "0" };
    headers.insert(HEADER_DEGRADED, HeaderValue::from_static(degraded));
    if report.is_degraded() {
        let names = report
            .failed
            .iter()
            .map(|k| k.label())
            .collect::<Vec<_>>()
            .join(",");
        if let Ok(v) = HeaderValue::from_str(&names) {
            headers.insert(HEADER_FAILED_SOURCES, v);
        }
    }

    Ok((headers, Json(report.response)))
}
