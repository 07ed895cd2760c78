// src/sources/mod.rs
pub mod fixture;
pub mod http;

use anyhow::Result;

use crate::catalog::{SourceBatch, SourceKind};

pub use fixture::StaticSource;
pub use http::HttpSource;

/// One upstream vendor catalog.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    fn kind(&self) -> SourceKind;
    async fn fetch_batch(&self) -> Result<SourceBatch>;
}
