// src/aggregate.rs
//! Fan-out to the three vendor sources, fold per-source failures to empty
//! batches, normalize and concatenate in A, B, C order.

use metrics::{counter, histogram};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::catalog::{CatalogResponse, SourceBatch, SourceKind};
use crate::config::Settings;
use crate::error::CatalogError;
use crate::normalize::normalize_batch;
use crate::sources::{HttpSource, SourceProvider};

/// Catalog plus the sources that were folded to empty on this request.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReport {
    pub response: CatalogResponse,
    pub failed: Vec<SourceKind>,
}

impl CatalogReport {
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }
}

pub struct CatalogAggregator {
    warung: Arc<dyn SourceProvider>,
    distro: Arc<dyn SourceProvider>,
    resto: Arc<dyn SourceProvider>,
}

impl CatalogAggregator {
    pub fn new(
        warung: Arc<dyn SourceProvider>,
        distro: Arc<dyn SourceProvider>,
        resto: Arc<dyn SourceProvider>,
    ) -> Self {
        Self {
            warung,
            distro,
            resto,
        }
    }

    /// HTTP sources for the configured vendor URLs, sharing one client and secret.
    pub fn from_settings(settings: &Settings) -> Self {
        let client = Client::new();
        let timeout = settings.source_timeout();
        let http = |kind: SourceKind, url: &str| -> Arc<dyn SourceProvider> {
            Arc::new(
                HttpSource::new(kind, url, settings.api_secret.clone(), client.clone())
                    .with_timeout(timeout),
            )
        };
        Self::new(
            http(SourceKind::WarungKlontong, settings.vendor_a_url.as_str()),
            http(SourceKind::DistroFashion, settings.vendor_b_url.as_str()),
            http(SourceKind::RestoKuliner, settings.vendor_c_url.as_str()),
        )
    }

    /// Fetch all three sources concurrently; every branch runs to completion.
    pub async fn collect(&self) -> (Vec<SourceBatch>, Vec<SourceKind>) {
        let (a, b, c) = tokio::join!(
            fetch_or_empty(SourceKind::WarungKlontong, self.warung.as_ref()),
            fetch_or_empty(SourceKind::DistroFashion, self.distro.as_ref()),
            fetch_or_empty(SourceKind::RestoKuliner, self.resto.as_ref()),
        );

        let mut batches = Vec::with_capacity(3);
        let mut failed = Vec::new();
        for (batch, ok) in [a, b, c] {
            if !ok {
                failed.push(batch.kind());
            }
            batches.push(batch);
        }
        (batches, failed)
    }

    /// Build the unified catalog for one request.
    pub async fn build(&self) -> Result<CatalogReport, CatalogError> {
        let t0 = Instant::now();
        counter!("catalog_requests_total").increment(1);

        let (batches, failed) = self.collect().await;
        let mut data = Vec::with_capacity(batches.iter().map(SourceBatch::len).sum());
        for batch in batches {
            let kind = batch.kind();
            let before = data.len();
            normalize_batch(batch, &mut data)?;
            counter!("catalog_entries_total", "source" => kind.label())
                .increment((data.len() - before) as u64);
        }

        let response = CatalogResponse::new(data);
        histogram!("catalog_build_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        info!(total = response.total, failed = failed.len(), "catalog built");
        Ok(CatalogReport { response, failed })
    }
}

/// `(batch, true)` on success, `(empty, false)` when the source is down.
async fn fetch_or_empty(kind: SourceKind, source: &dyn SourceProvider) -> (SourceBatch, bool) {
    match source.fetch_batch().await {
        Ok(batch) if batch.kind() == kind => (batch, true),
        Ok(batch) => {
            warn!(
                source = %kind,
                provider = %source.kind(),
                got = %batch.kind(),
                "source returned another vendor's batch"
            );
            counter!("catalog_source_errors_total", "source" => kind.label()).increment(1);
            (SourceBatch::empty(kind), false)
        }
        Err(e) => {
            warn!(error = ?e, source = %kind, "source unavailable, serving it as empty");
            counter!("catalog_source_errors_total", "source" => kind.label()).increment(1);
            (SourceBatch::empty(kind), false)
        }
    }
}
