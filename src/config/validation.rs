//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Validate addresses and paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TrackerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::TrackerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &TrackerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let timeouts = [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("discovery.lookup_timeout_secs", config.discovery.lookup_timeout_secs),
        ("discovery.probe_timeout_secs", config.discovery.probe_timeout_secs),
        ("generation.timeout_secs", config.generation.timeout_secs),
    ];
    for (field, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    let tracker_url = config.discovery.tracker_url.as_str();
    if !(tracker_url.starts_with("http://") || tracker_url.starts_with("https://"))
        || url::Url::parse(tracker_url).is_err()
    {
        errors.push(ValidationError::new(
            "discovery.tracker_url",
            format!("'{}' is not an http(s) URL", tracker_url),
        ));
    }

    for (field, path) in [
        ("discovery.health_path", &config.discovery.health_path),
        ("generation.endpoint_path", &config.generation.endpoint_path),
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field, "must start with '/'"));
        }
    }

    let limits = &config.generation.word_limits;
    for (field, limit) in [
        ("generation.word_limits.short", limits.short),
        ("generation.word_limits.technical", limits.technical),
        ("generation.word_limits.human-friendly", limits.human_friendly),
    ] {
        if limit == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
