//! Ephemeral caption backend registry, discovery client and caption orchestrator.

pub mod config;
pub mod discovery;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orchestrator;
pub mod registry;

pub use config::schema::TrackerConfig;
pub use discovery::{ConnectionState, DiscoveryClient};
pub use error::{Recovery, TrackerError, TrackerResult};
pub use http::TrackerServer;
pub use lifecycle::Shutdown;
pub use orchestrator::{CaptionOrchestrator, GenerationResult};
