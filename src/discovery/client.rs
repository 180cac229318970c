//! Registry lookup and connection tracking.
//!
//! # Responsibilities
//! - Ask the registry for the current backend (single attempt, bounded)
//! - Confirm the returned address answers its health path
//! - Hold the resulting ConnectionState and resolved URL
//!
//! # Design Decisions
//! - Discovery runs only when explicitly triggered; there is no poll timer
//! - No automatic retries; the caller re-invokes `find_backend`
//! - Every failure becomes a state plus `last_error`, never a returned error

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;

use crate::config::DiscoveryConfig;
use crate::discovery::probe::{probe_backend, ProbeOutcome};
use crate::discovery::state::ConnectionState;
use crate::discovery::transport::{endpoint, http_client};
use crate::error::{Recovery, TrackerError, TrackerResult};
use crate::http::response::UrlResponse;
use crate::registry::{BackendDescriptor, Lookup};

/// Snapshot of the client's view, for display.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    pub state: ConnectionState,
    pub backend_url: Option<String>,
    pub backend: Option<BackendDescriptor>,
    pub error: Option<String>,
    pub recovery: Option<Recovery>,
}

pub struct DiscoveryClient {
    http: Client,
    config: DiscoveryConfig,
    state: ConnectionState,
    backend_url: Option<String>,
    backend: Option<BackendDescriptor>,
    last_error: Option<TrackerError>,
}

impl DiscoveryClient {
    pub fn new(config: DiscoveryConfig) -> TrackerResult<Self> {
        let http = http_client(config.use_system_proxy)?;
        Ok(Self {
            http,
            config,
            state: ConnectionState::Checking,
            backend_url: None,
            backend: None,
            last_error: None,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The address requests may be sent to. `Some` only in a usable state.
    pub fn backend_url(&self) -> Option<&str> {
        if self.state.is_usable() {
            self.backend_url.as_deref()
        } else {
            None
        }
    }

    /// The descriptor from the most recent lookup, even if it failed its probe.
    pub fn backend(&self) -> Option<&BackendDescriptor> {
        self.backend.as_ref()
    }

    pub fn last_error(&self) -> Option<&TrackerError> {
        self.last_error.as_ref()
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn report(&self) -> DiscoveryReport {
        DiscoveryReport {
            state: self.state,
            backend_url: self.backend_url().map(str::to_string),
            backend: self.backend.clone(),
            error: self.last_error.as_ref().map(ToString::to_string),
            recovery: self.last_error.as_ref().map(TrackerError::recovery),
        }
    }

    /// One bounded `GET /url` against the registry.
    pub async fn lookup(&self) -> TrackerResult<Lookup> {
        let secs = self.config.lookup_timeout_secs;
        let url = endpoint(&self.config.tracker_url, "/url");

        let response = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(secs))
            .send()
            .await
            .map_err(|e| TrackerError::from_transport(&e, secs, "the tracker did not respond"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Tracker {
                status: status.as_u16(),
            });
        }

        let body: UrlResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::from_transport(&e, secs, "the tracker did not respond"))?;

        let found = body.success && body.backend.is_published();
        Ok(Lookup {
            descriptor: body.backend,
            found,
        })
    }

    /// Probe `url` on the configured health path.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        probe_backend(
            &self.http,
            url,
            &self.config.health_path,
            Duration::from_secs(self.config.probe_timeout_secs),
        )
        .await
    }

    /// Look up the current backend and verify it directly.
    pub async fn find_backend(&mut self) -> ConnectionState {
        self.state = ConnectionState::Checking;
        self.backend_url = None;
        self.last_error = None;

        let result = self.lookup().await;
        let (state, error) = match result {
            Ok(lookup) if !lookup.found => {
                self.backend = None;
                (ConnectionState::Disconnected, Some(TrackerError::NotFound))
            }
            Ok(lookup) => self.verify(lookup.descriptor).await,
            Err(e @ TrackerError::Tracker { .. }) => (ConnectionState::TrackerError, Some(e)),
            Err(e) => (ConnectionState::Error, Some(e)),
        };

        self.state = state;
        self.last_error = error;

        match &self.last_error {
            None => tracing::info!(url = ?self.backend_url, "Backend connected"),
            Some(e) => tracing::warn!(state = %state, error = %e, "Backend not connected"),
        }
        state
    }

    async fn verify(&mut self, descriptor: BackendDescriptor) -> (ConnectionState, Option<TrackerError>) {
        let url = descriptor.url.clone();
        let now = Utc::now();
        let stale_age = self
            .config
            .max_backend_age_secs
            .filter(|max| descriptor.is_stale_at(now, *max))
            .map(|_| descriptor.age_secs(now).unwrap_or_default());
        self.backend = Some(descriptor);

        if let Some(age_secs) = stale_age {
            return (ConnectionState::Disconnected, Some(TrackerError::Stale { age_secs }));
        }

        let outcome = self.probe(&url).await;
        if outcome.is_reachable() {
            self.backend_url = Some(url);
            (ConnectionState::Connected, None)
        } else {
            let error = outcome.into_error(self.config.probe_timeout_secs);
            (ConnectionState::Disconnected, error)
        }
    }

    /// Accept an operator-supplied address verbatim, skipping lookup and probe.
    pub fn use_manual_url(&mut self, url: &str) -> TrackerResult<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(TrackerError::InvalidUrl("empty URL".to_string()));
        }

        tracing::info!(url = %url, "Using manual backend URL");
        self.state = ConnectionState::Manual;
        self.backend_url = Some(url.to_string());
        self.backend = None;
        self.last_error = None;
        Ok(())
    }
}
