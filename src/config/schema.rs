//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tracker
//! service and its client. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrackerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Registry service settings.
    pub registry: RegistryConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Request limits and CORS.
    pub security: SecurityConfig,

    /// Client-side discovery settings.
    pub discovery: DiscoveryConfig,

    /// Client-side generation settings.
    pub generation: GenerationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Registry service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Name reported by `/health` and `/`.
    pub service_name: String,

    /// Model reported when a publish does not name one.
    pub default_model: String,

    /// Age after which `/status` reports the backend offline. Unset disables it.
    pub stale_after_secs: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            service_name: "Caption Backend Tracker".to_string(),
            default_model: "Qwen2.5-VL-7B-Instruct".to_string(),
            stale_after_secs: None,
        }
    }
}

/// Timeout configuration for the registry server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Allow any origin.
    pub cors_permissive: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
            cors_permissive: true,
        }
    }
}

/// Discovery client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Base URL of the registry service.
    pub tracker_url: String,

    /// Registry lookup timeout in seconds.
    pub lookup_timeout_secs: u64,

    /// Backend reachability probe timeout in seconds.
    pub probe_timeout_secs: u64,

    /// Path probed on the backend.
    pub health_path: String,

    /// Reject descriptors older than this. Unset accepts any age.
    pub max_backend_age_secs: Option<u64>,

    /// Honour HTTP(S)_PROXY environment variables.
    pub use_system_proxy: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            tracker_url: "http://localhost:5000".to_string(),
            lookup_timeout_secs: 10,
            probe_timeout_secs: 10,
            health_path: "/health".to_string(),
            max_backend_age_secs: None,
            use_system_proxy: true,
        }
    }
}

/// Caption generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Path of the generation endpoint on the backend.
    pub endpoint_path: String,

    /// Generation timeout in seconds. Inference on a cold backend is slow.
    pub timeout_secs: u64,

    /// Appended to captions cut at the word limit.
    pub ellipsis: String,

    /// Default per-style word limits.
    pub word_limits: WordLimitDefaults,

    /// Honour HTTP(S)_PROXY environment variables.
    pub use_system_proxy: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/generate-captions".to_string(),
            timeout_secs: 120,
            ellipsis: "...".to_string(),
            word_limits: WordLimitDefaults::default(),
            use_system_proxy: true,
        }
    }
}

/// Default word caps per caption style.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WordLimitDefaults {
    pub short: u32,
    pub technical: u32,
    #[serde(rename = "human-friendly")]
    pub human_friendly: u32,
}

impl Default for WordLimitDefaults {
    fn default() -> Self {
        Self {
            short: 15,
            technical: 35,
            human_friendly: 25,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
