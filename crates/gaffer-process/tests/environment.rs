//! Environment inheritance against a real child process.
//!
//! Kept in its own test binary because it mutates the supervisor's
//! environment.
#![cfg(unix)]

use gaffer_log_collection::{CircularBufferSink, LineSink};
use gaffer_process::{Environment, PassThrough, ProcessHandle};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

async fn run_and_capture(
    script: &str,
    enhancer: Arc<dyn gaffer_process::EnvironmentEnhancer>,
) -> Vec<String> {
    let sink = Arc::new(CircularBufferSink::new(64));
    let line_sink: Arc<dyn LineSink> = sink.clone();
    let mut handle = ProcessHandle::new(
        ".",
        "env-check",
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        8080,
        enhancer,
    )
    .unwrap()
    .with_line_sink(line_sink);

    handle.start().unwrap();
    timeout(TEST_TIMEOUT, handle.wait_for()).await.unwrap().unwrap();
    timeout(TEST_TIMEOUT, handle.wait_for_output()).await.unwrap();
    sink.lines()
}

#[tokio::test]
async fn non_unicode_variables_are_inherited() {
    std::env::set_var("GAFFER_TEST_BYTES", OsStr::from_bytes(b"caf\xe9"));
    std::env::set_var("GAFFER_TEST_DROPPED", "visible");

    let lines = run_and_capture(
        "printf '%s' \"$GAFFER_TEST_BYTES\" | od -An -tx1 | tr -d ' \\n'; echo",
        Arc::new(PassThrough),
    )
    .await;
    assert_eq!(lines, vec!["636166e9".to_string()]);

    // Removing a Unicode variable still works while the bytes variable survives.
    let enhancer = |mut base: Environment| {
        base.remove("GAFFER_TEST_DROPPED");
        base
    };
    let lines = run_and_capture(
        "echo \"[${GAFFER_TEST_DROPPED-UNSET}] [${GAFFER_TEST_BYTES+SET}] $PORT\"",
        Arc::new(enhancer),
    )
    .await;
    assert_eq!(lines, vec!["[UNSET] [SET] 8080".to_string()]);
}
