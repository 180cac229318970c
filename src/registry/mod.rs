//! Backend registry subsystem.
//!
//! # Data Flow
//! ```text
//! Backend process starts behind a tunnel
//!     → POST /url (http layer)
//!     → store.rs (validate, normalise, supersede under one lock)
//!         → history.rs (append superseded entry, evict oldest beyond 5)
//!         → descriptor.rs (new current BackendDescriptor)
//!
//! Client polls
//!     → GET /url, /status, /history
//!     → store.rs (snapshot under the same lock)
//! ```
//!
//! # Design Decisions
//! - Exactly one current descriptor; publish replaces it wholesale
//! - History trim happens inside the publish critical section
//! - No TTL filtering on lookup; staleness is judged from `last_updated`

pub mod descriptor;
pub mod history;
pub mod store;
pub mod timestamp;

pub use descriptor::{BackendDescriptor, BackendStatus, HistoryEntry};
pub use history::{UrlHistory, HISTORY_CAPACITY};
pub use store::{Lookup, RegistryStore, SelfHealth};
