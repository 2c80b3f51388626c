//! Stream drain tasks
//!
//! A drain reads one child output stream until end-of-data and forwards every
//! newline-terminated line to a [`LineSink`]. An unterminated trailing line at
//! end of stream is discarded. Read errors end the drain quietly; the owning
//! process handle is the authority on failures.

use crate::sink::LineSink;
use crate::types::StreamType;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

/// Drain `stream` into `sink`, returning the number of lines forwarded.
pub async fn drain_lines<R>(stream: R, stream_type: StreamType, sink: Arc<dyn LineSink>) -> u64
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    let mut forwarded = 0u64;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if buf.last() != Some(&b'\n') {
                    debug!(stream = %stream_type, bytes = buf.len(), "Discarding unterminated trailing line");
                    break;
                }
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }

                let line = String::from_utf8_lossy(&buf);
                sink.write_line(stream_type, &line);
                forwarded += 1;
            }
            Err(e) => {
                debug!(stream = %stream_type, error = %e, "Stream read failed, stopping drain");
                break;
            }
        }
    }

    debug!(stream = %stream_type, lines = forwarded, "Stream drain finished");
    forwarded
}

/// Schedule [`drain_lines`] on the current Tokio runtime.
///
/// Must be called from within a runtime.
pub fn spawn_drain<R>(stream: R, stream_type: StreamType, sink: Arc<dyn LineSink>) -> JoinHandle<u64>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(drain_lines(stream, stream_type, sink))
}
