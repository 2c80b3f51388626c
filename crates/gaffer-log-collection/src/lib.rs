//! # Gaffer Log Collection
//!
//! Line-oriented capture of child process output.
//!
//! This crate provides:
//! - The [`LineSink`] boundary that captured lines are handed to
//! - A `tracing`-backed sink and an in-memory ring buffer sink
//! - Stream drain tasks that read a child's stdout/stderr line by line

pub mod drain;
pub mod sink;
pub mod types;

// Re-export main types
pub use drain::{drain_lines, spawn_drain};
pub use sink::{CircularBufferSink, LineSink, TracingLineSink};
pub use types::{LogEntry, StreamType};
