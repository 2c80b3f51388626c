//! # Gaffer Common
//!
//! Error types shared across the Gaffer crates.

pub mod errors;

// Re-export commonly used items
pub use errors::{ProcessError, ProcessResult};
