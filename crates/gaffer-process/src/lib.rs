//! # Gaffer Process
//!
//! Supervision of a single external process.
//!
//! This crate provides:
//! - [`ProcessHandle`]: spawn, wait, liveness and exit queries, termination
//! - Environment enhancement with a forced `PORT` variable
//! - YAML process definitions
//!
//! ```rust,no_run
//! use gaffer_process::{PassThrough, ProcessHandle};
//! use std::sync::Arc;
//!
//! # async fn run() -> gaffer_common::ProcessResult<()> {
//! let mut web = ProcessHandle::new(
//!     "/srv/app",
//!     "web",
//!     vec!["python3".into(), "-m".into(), "http.server".into()],
//!     8000,
//!     Arc::new(PassThrough),
//! )?;
//! web.start()?;
//! web.wait_for().await?;
//! assert!(!web.is_alive());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod environment;
pub mod handle;
pub mod status;
pub mod terminate;
pub mod validation;

// Re-export main types
pub use config::ProcessSpec;
pub use environment::{
    base_environment, effective_environment, environment_changes, Environment, EnvironmentChanges,
    EnvironmentEnhancer, Overlay, PassThrough, PORT_VAR,
};
pub use handle::ProcessHandle;
pub use status::ProcessStatus;
pub use terminate::request_termination;
pub use validation::{validate_command, validate_process_name};
