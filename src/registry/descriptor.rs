//! Published backend records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of the current backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    Online,
}

/// The single currently-published backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendDescriptor {
    /// Absolute base address without a trailing slash. Empty until first publish.
    pub url: String,

    /// Time of the last publish.
    #[serde(with = "crate::registry::timestamp")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Absent until first publish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BackendStatus>,

    /// What the backend serves. Opaque to the registry.
    pub model: String,

    /// Seconds since this URL was first published. Advisory only.
    #[serde(rename = "uptime")]
    pub uptime_seconds: u64,
}

impl Default for BackendDescriptor {
    fn default() -> Self {
        Self::empty(String::new())
    }
}

impl BackendDescriptor {
    /// The pre-publish descriptor.
    pub fn empty(model: String) -> Self {
        Self {
            url: String::new(),
            last_updated: None,
            status: None,
            model,
            uptime_seconds: 0,
        }
    }

    /// True once something has been published.
    pub fn is_published(&self) -> bool {
        !self.url.is_empty()
    }

    pub fn is_online(&self) -> bool {
        self.status == Some(BackendStatus::Online)
    }

    /// Seconds elapsed since `last_updated`, if it was ever set.
    pub fn age_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_updated.map(|t| (now - t).num_seconds())
    }

    /// Whether the descriptor is older than `max_age_secs` at `now`.
    pub fn is_stale_at(&self, now: DateTime<Utc>, max_age_secs: u64) -> bool {
        match self.age_secs(now) {
            Some(age) => age > i64::try_from(max_age_secs).unwrap_or(i64::MAX),
            None => true,
        }
    }
}

/// A superseded descriptor kept for operator visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,

    /// The `last_updated` the URL carried when it was replaced.
    #[serde(default, with = "crate::registry::timestamp")]
    pub last_used: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_empty_descriptor_serializes_without_status() {
        let d = BackendDescriptor::empty("m".into());
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["url"], "");
        assert!(json.get("status").is_none());
        assert_eq!(json["uptime"], 0);
        assert_eq!(json["last_updated"], "");
        assert!(!d.is_published());
    }

    #[test]
    fn test_staleness_uses_last_updated() {
        let now = Utc::now();
        let mut d = BackendDescriptor::empty("m".into());
        d.url = "https://abc.ngrok.io".into();
        d.last_updated = Some(now - Duration::seconds(120));

        assert!(d.is_stale_at(now, 60));
        assert!(!d.is_stale_at(now, 300));
    }

    #[test]
    fn test_descriptor_round_trips_wire_names() {
        let raw = r#"{"url":"https://abc.ngrok.io","last_updated":"2026-01-02T03:04:05Z","status":"online","model":"m","uptime":7}"#;
        let d: BackendDescriptor = serde_json::from_str(raw).unwrap();
        assert!(d.is_online());
        assert_eq!(d.uptime_seconds, 7);
    }

    #[test]
    fn test_descriptor_accepts_naive_and_empty_timestamps() {
        let naive: BackendDescriptor =
            serde_json::from_str(r#"{"url":"https://abc.ngrok.io","last_updated":"2026-10-14T12:00:00.123456"}"#)
                .unwrap();
        assert!(naive.last_updated.is_some());

        let empty: BackendDescriptor = serde_json::from_str(r#"{"url":"","last_updated":""}"#).unwrap();
        assert!(empty.last_updated.is_none());
    }
}
