// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::catalog::SourceKind;

/// Failure of the aggregation step itself. Per-source outages never end up here.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot normalize {vendor} record {key}: {reason}")]
    Normalize {
        vendor: SourceKind,
        key: String,
        reason: &'static str,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    details: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: "Integration Failed",
            details: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
