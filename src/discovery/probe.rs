//! Direct reachability probe against a backend.
//!
//! A probe never errors: every failure is an outcome the caller turns into
//! `disconnected`.

use std::time::Duration;

use reqwest::Client;
use tokio::time;

use crate::discovery::transport::endpoint;
use crate::error::TrackerError;
use crate::observability::metrics;

/// Why a probe did or did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    /// Answered with a non-success status.
    Status(u16),
    TimedOut,
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }

    /// The error to record for a failed probe.
    pub fn into_error(self, timeout_secs: u64) -> Option<TrackerError> {
        match self {
            ProbeOutcome::Reachable => None,
            ProbeOutcome::Status(status) => Some(TrackerError::Unhealthy { status }),
            ProbeOutcome::TimedOut => Some(TrackerError::Timeout {
                secs: timeout_secs,
                hint: "the backend may be cold-starting".to_string(),
            }),
            ProbeOutcome::Unreachable(reason) => Some(TrackerError::Connection(reason)),
        }
    }
}

/// Probe `base_url` + `health_path` within `timeout`.
pub async fn probe_backend(
    client: &Client,
    base_url: &str,
    health_path: &str,
    timeout: Duration,
) -> ProbeOutcome {
    let url = endpoint(base_url, health_path);

    let outcome = match time::timeout(timeout, client.get(&url).send()).await {
        Ok(Ok(response)) => {
            let status = response.status();
            if status.is_success() {
                ProbeOutcome::Reachable
            } else {
                tracing::warn!(url = %url, status = %status, "Health check failed: non-success status");
                ProbeOutcome::Status(status.as_u16())
            }
        }
        Ok(Err(e)) => {
            tracing::warn!(url = %url, error = %e, "Health check failed: connection error");
            ProbeOutcome::Unreachable(e.to_string())
        }
        Err(_) => {
            tracing::warn!(url = %url, "Health check failed: timeout");
            ProbeOutcome::TimedOut
        }
    };

    metrics::record_probe(outcome.is_reachable());
    outcome
}
