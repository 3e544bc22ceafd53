//! Metadata service error types
//!
//! Mirrors the four error kinds the service can surface: the first three
//! are structured HTTP responses, the fourth (`Transient`) never reaches a
//! client directly — it is swallowed by the repair loop and retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetadataError>;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("file already exists: {0}")]
    AlreadyExists(String),

    #[error("no alive data nodes available")]
    NoCapacity,

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("data node I/O failed: {0}")]
    Transient(String),
}

impl IntoResponse for MetadataError {
    fn into_response(self) -> Response {
        let status = match &self {
            MetadataError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            MetadataError::NoCapacity => StatusCode::INTERNAL_SERVER_ERROR,
            MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
            MetadataError::Transient(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
