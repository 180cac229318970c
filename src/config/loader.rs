//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::TrackerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, apply environment overrides, and validate a TOML file.
pub fn load_config(path: &Path) -> Result<TrackerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: TrackerConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Defaults plus environment overrides, validated.
pub fn default_config() -> Result<TrackerConfig, ConfigError> {
    let mut config = TrackerConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `PORT` and `TRACKER_URL` overrides.
pub fn apply_env_overrides<F>(config: &mut TrackerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
        match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                config.listener.bind_address = addr.to_string();
            }
            Err(_) => {
                config.listener.bind_address = format!("0.0.0.0:{}", port);
            }
        }
    }

    if let Some(url) = lookup("TRACKER_URL").filter(|u| !u.trim().is_empty()) {
        config.discovery.tracker_url = url.trim().trim_end_matches('/').to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[registry]
default_model = "llava-1.6"
stale_after_secs = 900

[generation.word_limits]
short = 10
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.registry.default_model, "llava-1.6");
        assert_eq!(config.registry.stale_after_secs, Some(900));
        assert_eq!(config.generation.word_limits.short, 10);
        assert_eq!(config.generation.word_limits.technical, 35);
        assert_eq!(config.discovery.lookup_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generation]\ntimeout_secs = 0").unwrap();

        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors[0].field, "generation.timeout_secs");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nbind_address = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut config = TrackerConfig::default();
        config.listener.bind_address = "127.0.0.1:5000".into();
        apply_env_overrides(&mut config, env(&[("PORT", "10000")]));
        assert_eq!(config.listener.bind_address, "127.0.0.1:10000");
    }

    #[test]
    fn test_tracker_url_override_strips_slash() {
        let mut config = TrackerConfig::default();
        apply_env_overrides(&mut config, env(&[("TRACKER_URL", "https://tracker.onrender.com/")]));
        assert_eq!(config.discovery.tracker_url, "https://tracker.onrender.com");
    }

    #[test]
    fn test_garbage_port_is_ignored() {
        let mut config = TrackerConfig::default();
        apply_env_overrides(&mut config, env(&[("PORT", "eighty")]));
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
    }
}
