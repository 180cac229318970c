//! Backend discovery subsystem.
//!
//! # Data Flow
//! ```text
//! find_backend (explicit trigger)
//!     → client.rs (GET {tracker}/url, 10s, single attempt)
//!     → probe.rs (GET {backend}/health, 10s)
//!     → state.rs (Connected | Disconnected | TrackerError | Error)
//!
//! use_manual_url
//!     → state.rs (Manual, no lookup, no probe)
//! ```

pub mod client;
pub mod probe;
pub mod state;
pub mod transport;

pub use client::{DiscoveryClient, DiscoveryReport};
pub use probe::ProbeOutcome;
pub use state::ConnectionState;
