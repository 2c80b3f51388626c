//! ProcessHandle - supervision of a single child process
//!
//! A handle is one-shot: it is fully configured at construction, spawns its
//! child once, and stays queryable after the child exits. Liveness and exit
//! status always come from the OS (`try_wait`), never from state tracked on
//! the side.

use crate::config::ProcessSpec;
use crate::environment::{
    base_environment, effective_environment, environment_changes, EnvironmentEnhancer, Overlay,
};
use crate::status::ProcessStatus;
use crate::terminate::request_termination;
use crate::validation::{validate_command, validate_process_name};
use gaffer_common::{ProcessError, ProcessResult};
use gaffer_log_collection::{spawn_drain, LineSink, StreamType, TracingLineSink};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

/// Supervises exactly one external process.
pub struct ProcessHandle {
    name: String,
    working_directory: PathBuf,
    command: Vec<String>,
    port: u16,
    environment_enhancer: Arc<dyn EnvironmentEnhancer>,
    line_sink: Arc<dyn LineSink>,

    /// Absent until a successful `start`, then kept for the handle's lifetime.
    child: Option<Child>,

    /// Drain tasks for stdout and stderr.
    drains: Vec<JoinHandle<u64>>,
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("name", &self.name)
            .field("working_directory", &self.working_directory)
            .field("command", &self.command)
            .field("port", &self.port)
            .field("pid", &self.pid())
            .field("drains", &self.drains.len())
            .finish()
    }
}

impl ProcessHandle {
    /// Create a handle. Nothing is spawned until [`ProcessHandle::start`].
    ///
    /// Captured output goes to a [`TracingLineSink`] named after the process
    /// unless replaced with [`ProcessHandle::with_line_sink`].
    pub fn new(
        working_directory: impl Into<PathBuf>,
        name: impl Into<String>,
        command: Vec<String>,
        port: u16,
        environment_enhancer: Arc<dyn EnvironmentEnhancer>,
    ) -> ProcessResult<Self> {
        let name = name.into();
        validate_process_name(&name)?;
        validate_command(&name, &command)?;

        Ok(Self {
            line_sink: Arc::new(TracingLineSink::new(name.clone())),
            name,
            working_directory: working_directory.into(),
            command,
            port,
            environment_enhancer,
            child: None,
            drains: Vec::new(),
        })
    }

    /// Create a handle from a YAML process definition; its `environment`
    /// entries become an [`Overlay`] enhancer.
    pub fn from_spec(spec: &ProcessSpec) -> ProcessResult<Self> {
        Self::new(
            spec.working_directory.clone(),
            spec.name.clone(),
            spec.command.clone(),
            spec.port,
            Arc::new(Overlay::new(spec.environment.clone())),
        )
    }

    /// Replace the sink that receives captured output lines.
    pub fn with_line_sink(mut self, line_sink: Arc<dyn LineSink>) -> Self {
        self.line_sink = line_sink;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// OS process id, while the child has not been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Spawn the child and schedule its stream drains.
    ///
    /// The child gets the supervisor's stdin, `working_directory` as its
    /// current directory, and the environment produced by the enhancer with
    /// `PORT` forced to the configured port. Must be called from within a
    /// Tokio runtime.
    ///
    /// A handle owns at most one child: calling this again after a successful
    /// start fails with [`ProcessError::AlreadyStarted`]. A failed start
    /// leaves the handle as if it had never been started.
    pub fn start(&mut self) -> ProcessResult<()> {
        if self.child.is_some() {
            return Err(ProcessError::already_started(&self.name));
        }

        let base = base_environment();
        let environment =
            effective_environment(self.environment_enhancer.as_ref(), base.clone(), self.port);
        let changes = environment_changes(&base, &environment);

        let (program, args) = match self.command.split_first() {
            Some(parts) => parts,
            None => return Err(ProcessError::configuration(&self.name, "Command cannot be empty")),
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.working_directory)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for key in &changes.removed {
            cmd.env_remove(key);
        }
        cmd.envs(changes.set.iter().map(|(key, value)| (key, value)));

        info!(
            process = %self.name,
            command = ?self.command,
            port = self.port,
            "Spawning process"
        );

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(process = %self.name, error = %e, "Failed to spawn process");
                return Err(ProcessError::start_failed(&self.name, e.to_string()));
            }
        };

        if let Some(stdout) = child.stdout.take() {
            self.drains
                .push(spawn_drain(stdout, StreamType::Stdout, Arc::clone(&self.line_sink)));
        }
        if let Some(stderr) = child.stderr.take() {
            self.drains
                .push(spawn_drain(stderr, StreamType::Stderr, Arc::clone(&self.line_sink)));
        }

        info!(process = %self.name, pid = ?child.id(), "Process spawned");
        self.child = Some(child);
        Ok(())
    }

    /// Wait until the child exits.
    ///
    /// Returns immediately when the child was never started or has already
    /// exited. Does not wait for the drains to finish and does not interpret
    /// the exit code. If the wait itself fails the child keeps running and
    /// [`ProcessError::WaitInterrupted`] is returned.
    pub async fn wait_for(&mut self) -> ProcessResult<()> {
        if !self.is_alive() {
            return Ok(());
        }

        let child = match self.child.as_mut() {
            Some(child) => child,
            None => return Ok(()),
        };

        match child.wait().await {
            Ok(status) => {
                debug!(process = %self.name, status = %status, "Process exited");
                Ok(())
            }
            Err(e) => {
                warn!(process = %self.name, error = %e, "Wait for process interrupted");
                Err(ProcessError::wait_interrupted(&self.name, e.to_string()))
            }
        }
    }

    /// Current status, queried from the OS without blocking.
    pub fn status(&mut self) -> ProcessStatus {
        let child = match self.child.as_mut() {
            Some(child) => child,
            None => return ProcessStatus::NotStarted,
        };

        match child.try_wait() {
            Ok(None) => ProcessStatus::Running,
            Ok(Some(status)) => ProcessStatus::Exited(status),
            Err(e) => {
                // No exit status could be obtained, so the child is not known to have exited.
                warn!(process = %self.name, error = %e, "Failed to query process status");
                ProcessStatus::Running
            }
        }
    }

    /// Non-blocking liveness check. False if never started.
    pub fn is_alive(&mut self) -> bool {
        self.status().is_alive()
    }

    /// True only if the child was started, has exited, and did not succeed.
    pub fn exited_with_error(&mut self) -> bool {
        self.status().exited_with_error()
    }

    /// Request termination of a live child. No-op otherwise.
    ///
    /// The request is asynchronous: `is_alive` may keep returning true until
    /// the OS has torn the process down.
    pub fn kill(&mut self) {
        if !self.is_alive() {
            debug!(process = %self.name, "Kill requested but process is not alive");
            return;
        }

        if let Some(child) = self.child.as_mut() {
            match request_termination(child) {
                Ok(()) => info!(process = %self.name, "Termination requested"),
                Err(e) => warn!(process = %self.name, error = %e, "Failed to request termination"),
            }
        }
    }

    /// Wait for the output drains to reach end of stream and return the total
    /// number of lines forwarded. Returns 0 if the process never started.
    pub async fn wait_for_output(&mut self) -> u64 {
        let mut total = 0;
        for task in self.drains.drain(..) {
            match task.await {
                Ok(lines) => total += lines,
                Err(e) => warn!(process = %self.name, error = %e, "Drain task failed"),
            }
        }
        total
    }

    /// Like [`ProcessHandle::wait_for_output`], but gives up after `limit`.
    ///
    /// Output pipes stay open as long as any descendant of the child holds
    /// them, so the drains can outlive the child indefinitely. Returns `None`
    /// on timeout; unfinished drains keep running detached.
    pub async fn wait_for_output_within(&mut self, limit: Duration) -> Option<u64> {
        match timeout(limit, self.wait_for_output()).await {
            Ok(lines) => Some(lines),
            Err(_) => {
                debug!(process = %self.name, limit = ?limit, "Output still open, not waiting for drains");
                None
            }
        }
    }
}
