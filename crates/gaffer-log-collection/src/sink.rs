//! Line sinks for captured process output

use crate::types::{LogEntry, StreamType};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::debug;

/// Accepts captured output one line at a time.
///
/// Both drain tasks of a process write to the same sink concurrently, so
/// implementations must tolerate interleaved calls. No ordering is guaranteed
/// between lines of different streams.
pub trait LineSink: Send + Sync {
    fn write_line(&self, stream: StreamType, line: &str);
}

impl<F> LineSink for F
where
    F: Fn(StreamType, &str) + Send + Sync,
{
    fn write_line(&self, stream: StreamType, line: &str) {
        self(stream, line)
    }
}

/// Emits every line as a `tracing` debug event tagged with the process name.
#[derive(Debug, Clone)]
pub struct TracingLineSink {
    process: String,
}

impl TracingLineSink {
    pub fn new(process: impl Into<String>) -> Self {
        Self {
            process: process.into(),
        }
    }

    pub fn process(&self) -> &str {
        &self.process
    }
}

impl LineSink for TracingLineSink {
    fn write_line(&self, stream: StreamType, line: &str) {
        debug!(process = %self.process, stream = %stream, "{}", line);
    }
}

/// Circular buffer sink (keeps last N log entries)
#[derive(Debug)]
pub struct CircularBufferSink {
    buffer: Mutex<VecDeque<LogEntry>>,
    max_size: usize,
}

impl CircularBufferSink {
    pub fn new(max_size: usize) -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(max_size)),
            max_size,
        }
    }

    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.buffer.lock().iter().cloned().collect()
    }

    /// Messages only, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.buffer
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn contains_line(&self, line: &str) -> bool {
        self.buffer.lock().iter().any(|entry| entry.message == line)
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

impl LineSink for CircularBufferSink {
    fn write_line(&self, stream: StreamType, line: &str) {
        if self.max_size == 0 {
            return;
        }

        let mut buffer = self.buffer.lock();
        if buffer.len() == self.max_size {
            buffer.pop_front();
        }
        buffer.push_back(LogEntry::new(stream, line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_circular_buffer_keeps_last_entries() {
        let sink = CircularBufferSink::new(2);
        sink.write_line(StreamType::Stdout, "one");
        sink.write_line(StreamType::Stderr, "two");
        sink.write_line(StreamType::Stdout, "three");

        assert_eq!(sink.lines(), vec!["two".to_string(), "three".to_string()]);
        let logs = sink.get_logs();
        assert_eq!(logs[0].stream, StreamType::Stderr);
        assert_eq!(logs[1].stream, StreamType::Stdout);
    }

    #[test]
    fn test_zero_capacity_buffer_stores_nothing() {
        let sink = CircularBufferSink::new(0);
        sink.write_line(StreamType::Stdout, "dropped");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink = move |stream: StreamType, line: &str| {
            seen_clone.lock().push(format!("{}:{}", stream, line));
        };

        sink.write_line(StreamType::Stderr, "boom");
        assert_eq!(*seen.lock(), vec!["stderr:boom".to_string()]);
    }

    #[test]
    fn test_concurrent_writers() {
        let sink = Arc::new(CircularBufferSink::new(1000));
        let handles: Vec<_> = [StreamType::Stdout, StreamType::Stderr]
            .into_iter()
            .map(|stream| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        sink.write_line(stream, &format!("{} {}", stream, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(sink.len(), 200);
        assert!(sink.contains_line("stdout 99"));
        assert!(sink.contains_line("stderr 0"));
    }
}
