//! Lock-guarded registry store.
//!
//! # Responsibilities
//! - Own the current BackendDescriptor and the supersede history
//! - Make "read current, maybe append history, write new current" atomic
//! - Hand out snapshots; callers never touch the fields directly

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use url::Url;

use crate::config::RegistryConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::observability::metrics;
use crate::registry::descriptor::{BackendDescriptor, BackendStatus, HistoryEntry};
use crate::registry::history::UrlHistory;

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub descriptor: BackendDescriptor,
    /// False when nothing has ever been published.
    pub found: bool,
}

/// Liveness of the registry process itself.
#[derive(Debug, Clone)]
pub struct SelfHealth {
    pub status: &'static str,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

struct Inner {
    current: BackendDescriptor,
    /// When the current URL was first published. Not reset by identical republish.
    online_since: Option<Instant>,
    history: UrlHistory,
}

impl Inner {
    fn snapshot(&self) -> BackendDescriptor {
        let mut descriptor = self.current.clone();
        descriptor.uptime_seconds = self
            .online_since
            .map(|since| since.elapsed().as_secs())
            .unwrap_or(0);
        descriptor
    }
}

/// Process-wide registry state. Share it behind an `Arc`.
pub struct RegistryStore {
    inner: Mutex<Inner>,
    config: RegistryConfig,
}

impl RegistryStore {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: BackendDescriptor::empty(config.default_model.clone()),
                online_since: None,
                history: UrlHistory::new(),
            }),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Mutations are whole-field assignments after validation, so a
        // poisoned guard still holds a consistent Inner.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a backend address, superseding the current one.
    pub fn publish(&self, raw_url: &str, model: Option<&str>) -> TrackerResult<BackendDescriptor> {
        let url = normalize_url(raw_url)?;
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.config.default_model)
            .to_string();

        let mut inner = self.lock();
        let changed = inner.current.url != url;

        if changed && inner.current.is_published() {
            let superseded = HistoryEntry {
                url: inner.current.url.clone(),
                last_used: inner.current.last_updated,
            };
            tracing::info!(previous = %superseded.url, next = %url, "Backend superseded");
            if let Some(evicted) = inner.history.push(superseded) {
                tracing::debug!(url = %evicted.url, "History entry evicted");
            }
        }
        if changed {
            inner.online_since = Some(Instant::now());
        }

        inner.current = BackendDescriptor {
            url,
            last_updated: Some(Utc::now()),
            status: Some(BackendStatus::Online),
            model,
            uptime_seconds: 0,
        };

        let descriptor = inner.snapshot();
        let history_len = inner.history.len();
        drop(inner);

        metrics::record_publish(changed);
        metrics::record_history_len(history_len);
        tracing::info!(url = %descriptor.url, model = %descriptor.model, changed, "URL updated");

        Ok(descriptor)
    }

    /// Current descriptor as-is. No freshness filtering.
    pub fn lookup(&self) -> Lookup {
        let descriptor = self.lock().snapshot();
        let found = descriptor.is_published();
        metrics::record_lookup(found);
        Lookup { descriptor, found }
    }

    /// Current descriptor plus the oldest-first history.
    pub fn history(&self) -> (BackendDescriptor, Vec<HistoryEntry>) {
        let inner = self.lock();
        (inner.snapshot(), inner.history.to_vec())
    }

    pub fn self_health(&self) -> SelfHealth {
        SelfHealth {
            status: "healthy",
            service: self.config.service_name.clone(),
            timestamp: Utc::now(),
        }
    }

    /// `Some(stale)` when a TTL is configured, `None` otherwise.
    pub fn stale_flag(&self, descriptor: &BackendDescriptor, now: DateTime<Utc>) -> Option<bool> {
        self.config
            .stale_after_secs
            .map(|ttl| descriptor.is_published() && descriptor.is_stale_at(now, ttl))
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

/// Validate and normalise a publish URL: trimmed, http(s), no trailing slash.
pub fn normalize_url(raw: &str) -> TrackerResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(TrackerError::InvalidUrl("empty URL".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(TrackerError::InvalidUrl(trimmed.to_string()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| TrackerError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(TrackerError::InvalidUrl(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}
