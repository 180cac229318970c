//! Registry HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID span, publish body)
//!     → handlers.rs (one handler per endpoint, store access only)
//!     → response.rs (JSON envelopes, error bodies)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Handlers never panic or bubble errors; failures are JSON bodies
//! - Envelope types are shared with the discovery client

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, TrackerServer};
