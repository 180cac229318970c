//! Caption orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! resolved backend URL (discovery) + image + styles + word limits
//!     → image.rs (decode, re-encode PNG, base64)
//!     → generator.rs (one POST {backend}/generate-captions, 120s)
//!     → generator.rs (require every requested style)
//!     → words.rs (truncate to limit + ellipsis)
//!     → result.rs (GenerationResult, success or structured failure)
//! ```

pub mod generator;
pub mod image;
pub mod result;
pub mod styles;
pub mod words;

pub use generator::CaptionOrchestrator;
pub use result::{Caption, GenerationResult};
pub use styles::{CaptionStyle, StyleSelection, WordLimits};
pub use words::enforce_word_limit;
