//! Error types for supervised processes.
//!
//! Only the operations that can genuinely fail (construction, `start` and
//! `wait_for`) return these errors. Status queries are total.

use thiserror::Error;

/// Process-specific error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// The OS refused to spawn the child (bad executable, missing directory,
    /// permission error, ...). Carries the system message.
    #[error("Process start failed: {id} - {reason}")]
    StartFailed { id: String, reason: String },

    /// Waiting for the child failed before it exited. The child keeps running.
    #[error("Process wait interrupted: {id} - {reason}")]
    WaitInterrupted { id: String, reason: String },

    /// The handle already owns a child process (running or exited).
    #[error("Process already started: {id}")]
    AlreadyStarted { id: String },

    #[error("Process configuration error: {id} - {reason}")]
    Configuration { id: String, reason: String },
}

impl ProcessError {
    pub fn start_failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StartFailed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn wait_interrupted(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WaitInterrupted {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn already_started(id: impl Into<String>) -> Self {
        Self::AlreadyStarted { id: id.into() }
    }

    pub fn configuration(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Name of the process the error refers to.
    pub fn process_id(&self) -> &str {
        match self {
            Self::StartFailed { id, .. }
            | Self::WaitInterrupted { id, .. }
            | Self::AlreadyStarted { id }
            | Self::Configuration { id, .. } => id,
        }
    }
}

/// Result type for process operations.
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;
