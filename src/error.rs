//! Error taxonomy shared by the registry, discovery and generation layers.
//!
//! Every failure carries a [`Recovery`] hint so the presentation layer can
//! choose between retrying, finding a new backend or asking for new input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the caller should do about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovery {
    /// Transient; the same call may succeed if repeated.
    RetryNow,
    /// The known backend is gone or unknown; run discovery again.
    FindBackend,
    /// The request itself is wrong; retrying unchanged will not help.
    FixInput,
}

/// Errors produced anywhere in the tracker.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// Publish input is empty or not an absolute http(s) address.
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// The registry has never had a backend published.
    #[error("No active backend found")]
    NotFound,

    /// A generation call was attempted without a resolved backend.
    #[error("No backend URL found")]
    NoBackend,

    /// The registry or the backend did not answer within the bound.
    #[error("Timeout after {secs}s - {hint}")]
    Timeout { secs: u64, hint: String },

    /// Transport-level failure (refused, reset, DNS).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend answered but reported a failure.
    #[error("API error {status}: {message}")]
    Backend { status: u16, message: String },

    /// The published backend answered its health path with a failure status.
    #[error("Backend health check returned status {status}")]
    Unhealthy { status: u16 },

    /// The registry answered with a non-success status.
    #[error("Tracker returned status {status}")]
    Tracker { status: u16 },

    /// The published descriptor is older than the accepted age.
    #[error("Backend was last published {age_secs}s ago and is considered stale")]
    Stale { age_secs: i64 },

    /// A successful response is missing captions for requested styles.
    #[error("Backend response is missing captions for: {}", .missing.join(", "))]
    PartialResult { missing: Vec<String> },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The body could not be decoded as the documented contract.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl TrackerError {
    /// Recovery hint for the caller.
    pub fn recovery(&self) -> Recovery {
        match self {
            TrackerError::InvalidUrl(_)
            | TrackerError::InvalidImage(_)
            | TrackerError::InvalidRequest(_)
            | TrackerError::Backend { .. }
            | TrackerError::Client(_) => Recovery::FixInput,
            TrackerError::NotFound
            | TrackerError::NoBackend
            | TrackerError::Connection(_)
            | TrackerError::Unhealthy { .. }
            | TrackerError::Stale { .. } => Recovery::FindBackend,
            TrackerError::Timeout { .. }
            | TrackerError::Tracker { .. }
            | TrackerError::PartialResult { .. }
            | TrackerError::InvalidResponse(_) => Recovery::RetryNow,
        }
    }

    /// Stable identifier for logs and JSON bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            TrackerError::InvalidUrl(_) => "invalid_url",
            TrackerError::NotFound => "not_found",
            TrackerError::NoBackend => "no_backend",
            TrackerError::Timeout { .. } => "timeout",
            TrackerError::Connection(_) => "connection_error",
            TrackerError::Backend { .. } => "backend_error",
            TrackerError::Unhealthy { .. } => "unhealthy",
            TrackerError::Tracker { .. } => "tracker_error",
            TrackerError::Stale { .. } => "stale",
            TrackerError::PartialResult { .. } => "partial_result",
            TrackerError::InvalidImage(_) => "invalid_image",
            TrackerError::InvalidRequest(_) => "invalid_request",
            TrackerError::InvalidResponse(_) => "invalid_response",
            TrackerError::Client(_) => "client_error",
        }
    }

    /// Classify a reqwest failure. `hint` is attached to timeouts.
    pub(crate) fn from_transport(err: &reqwest::Error, timeout_secs: u64, hint: &str) -> Self {
        if err.is_timeout() {
            TrackerError::Timeout {
                secs: timeout_secs,
                hint: hint.to_string(),
            }
        } else if err.is_decode() {
            TrackerError::InvalidResponse(err.to_string())
        } else {
            TrackerError::Connection(err.to_string())
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
