//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (PORT / TRACKER_URL overrides)
//!     → validation.rs (semantic checks)
//!     → TrackerConfig (validated, immutable)
//!     → sections handed to the registry server and the client core
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config, load_config, ConfigError};
pub use schema::{
    DiscoveryConfig, GenerationConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    RegistryConfig, SecurityConfig, TimeoutConfig, TrackerConfig, WordLimitDefaults,
};
