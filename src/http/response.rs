//! JSON envelopes of the registry surface.
//!
//! The same types are deserialized by the discovery client, so every optional
//! field defaults when absent.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::registry::{BackendDescriptor, HistoryEntry};

/// `GET /url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub backend: BackendDescriptor,
    /// Present only when the registry has a TTL configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
}

/// `POST /url` success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub success: bool,
    pub message: String,
    pub backend: BackendDescriptor,
}

/// `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub online: bool,
    /// ISO-8601, empty before the first publish.
    pub last_updated: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
}

/// `GET /history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub current: BackendDescriptor,
    pub history: Vec<HistoryEntry>,
}

/// `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Failure body for any endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorBody {
    pub fn response(status: StatusCode, error: impl Into<String>, error_type: Option<&str>) -> Response {
        let body = ErrorBody {
            success: false,
            error: error.into(),
            error_type: error_type.map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}

fn status_code(err: &TrackerError) -> StatusCode {
    match err {
        TrackerError::InvalidUrl(_) | TrackerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        TrackerError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        ErrorBody::response(status_code(&self), self.to_string(), Some(self.error_type()))
    }
}
