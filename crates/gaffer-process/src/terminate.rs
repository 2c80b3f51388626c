//! Process termination primitives.
//!
//! Termination is a request, not a guarantee: these functions return as soon
//! as the OS accepted the request.

use std::io;
use tokio::process::Child;

/// Ask the child to terminate (SIGTERM on Unix, TerminateProcess on Windows).
///
/// A child that has already been reaped is treated as terminated.
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    #[cfg(unix)]
    {
        let pid = match child.id() {
            Some(pid) => pid,
            None => return Ok(()),
        };
        terminate_gracefully(pid)
    }

    #[cfg(not(unix))]
    {
        child.start_kill()
    }
}

/// Send SIGTERM to `pid`. A process that no longer exists is not an error.
#[cfg(unix)]
pub fn terminate_gracefully(pid: u32) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let nix_pid = Pid::from_raw(pid as i32);
    match kill(nix_pid, Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(io::Error::from_raw_os_error(e as i32)),
    }
}
