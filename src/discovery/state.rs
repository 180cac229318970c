//! Client-side connection state.
//!
//! # States
//! - Checking: discovery in progress
//! - Connected: registry returned a URL and its health probe passed
//! - Disconnected: nothing published, stale, or probe failed
//! - Manual: operator-supplied URL, never looked up or probed
//! - TrackerError: registry answered with a non-success status
//! - Error: registry unreachable or its answer undecodable
//!
//! # State Transitions
//! ```text
//! Checking → Connected: lookup found && probe succeeded
//! Checking → Disconnected: lookup not found || stale || probe failed
//! Checking → TrackerError | Error: lookup call failed
//! * → Checking: explicit find_backend
//! * → Manual: use_manual_url
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Checking,
    Connected,
    Disconnected,
    Manual,
    TrackerError,
    Error,
}

impl ConnectionState {
    /// Whether generation requests may be sent.
    pub fn is_usable(self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Manual)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Checking => "checking",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Manual => "manual",
            ConnectionState::TrackerError => "tracker_error",
            ConnectionState::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
