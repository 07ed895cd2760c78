use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder (once per process) and describe
    /// the catalog series. Later calls reuse the installed recorder.
    pub fn init() -> Result<Self> {
        let handle = HANDLE.get_or_try_init(install)?.clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn install() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("prometheus: install recorder")?;

    describe_counter!("catalog_requests_total", "Catalog builds started.");
    describe_counter!(
        "catalog_entries_total",
        "Unified entries produced, per source."
    );
    describe_counter!(
        "catalog_source_errors_total",
        "Sources folded to empty because fetch or decode failed."
    );
    describe_histogram!("catalog_build_ms", "Catalog build time in milliseconds.");
    describe_histogram!(
        "catalog_source_fetch_ms",
        "Successful vendor fetch time in milliseconds."
    );

    Ok(handle)
}
