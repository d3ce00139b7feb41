//! Sigfilt-Core: Foundation types for offline signal filtering
//!
//! Minimal core types: the `Signal` container and the error taxonomy shared
//! by the filtering pipeline.

pub mod signal;
pub mod error;

pub use signal::*;
pub use error::{FilterError, FilterResult};
