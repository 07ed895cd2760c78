// src/sources/fixture.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::catalog::{SourceBatch, SourceKind};
use crate::sources::SourceProvider;

/// In-memory source serving a fixed batch (or a fixed failure).
pub struct StaticSource {
    kind: SourceKind,
    mode: Mode,
    delay: Option<Duration>,
}

enum Mode {
    Batch(SourceBatch),
    Fail(String),
}

impl StaticSource {
    pub fn new(batch: SourceBatch) -> Self {
        Self {
            kind: batch.kind(),
            mode: Mode::Batch(batch),
            delay: None,
        }
    }

    pub fn failing(kind: SourceKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            mode: Mode::Fail(message.into()),
            delay: None,
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl SourceProvider for StaticSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch_batch(&self) -> Result<SourceBatch> {
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        match &self.mode {
            Mode::Batch(b) => Ok(b.clone()),
            Mode::Fail(msg) => Err(anyhow!("{}: {msg}", self.kind)),
        }
    }
}
