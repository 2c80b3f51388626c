//! Observed process status.

use std::process::ExitStatus;

/// Lifecycle position of a handle's child, as reported by the OS.
///
/// Moves only forward: `NotStarted` -> `Running` -> `Exited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    NotStarted,
    Running,
    Exited(ExitStatus),
}

impl ProcessStatus {
    pub fn is_alive(&self) -> bool {
        matches!(self, ProcessStatus::Running)
    }

    /// True once exited unsuccessfully. Termination by a signal carries no
    /// exit code and counts as an error.
    pub fn exited_with_error(&self) -> bool {
        match self {
            ProcessStatus::Exited(status) => !status.success(),
            _ => false,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessStatus::Exited(status) => status.code(),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessStatus::NotStarted => write!(f, "not started"),
            ProcessStatus::Running => write!(f, "running"),
            ProcessStatus::Exited(status) => write!(f, "exited ({})", status),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn test_not_started() {
        let status = ProcessStatus::NotStarted;
        assert!(!status.is_alive());
        assert!(!status.exited_with_error());
        assert_eq!(status.exit_code(), None);
    }

    #[test]
    fn test_running_is_never_an_error() {
        let status = ProcessStatus::Running;
        assert!(status.is_alive());
        assert!(!status.exited_with_error());
    }

    #[test]
    fn test_exit_codes() {
        let ok = ProcessStatus::Exited(ExitStatus::from_raw(0));
        assert!(!ok.is_alive());
        assert!(!ok.exited_with_error());
        assert_eq!(ok.exit_code(), Some(0));

        // Raw wait status: exit code lives in the second byte.
        let failed = ProcessStatus::Exited(ExitStatus::from_raw(3 << 8));
        assert!(failed.exited_with_error());
        assert_eq!(failed.exit_code(), Some(3));
    }

    #[test]
    fn test_signal_termination_is_error() {
        // SIGTERM, no core dump
        let killed = ProcessStatus::Exited(ExitStatus::from_raw(15));
        assert!(killed.exited_with_error());
        assert_eq!(killed.exit_code(), None);
    }
}
