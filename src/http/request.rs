//! Inbound request bodies and request-ID plumbing.

use axum::body::Body;
use axum::http::Request;
use serde::Deserialize;
use tracing::Span;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// `POST /url` body. Both fields are optional so a missing URL is a 400, not a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Trace span for an inbound request, tagged with its request ID.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
