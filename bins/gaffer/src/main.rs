use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use gaffer_process::{ProcessHandle, ProcessSpec};

/// How long to keep draining output after the child exited. Descendants that
/// inherited the pipes can hold them open forever.
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Gaffer - run and supervise a single process
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Process definition file (YAML)
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["name", "command"])]
    config: Option<PathBuf>,

    /// Process name (used in log output)
    #[arg(short, long)]
    name: Option<String>,

    /// Working directory for the process (overrides config, default ".")
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Port exported to the process as PORT (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Extra environment variable, KEY=VALUE (repeatable)
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,

    /// Enable debug logging (shows captured output)
    #[arg(long)]
    debug: bool,

    /// Command to run
    #[arg(last = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.debug)?;

    let spec = build_spec(args)?;
    info!(
        process = %spec.name,
        port = spec.port,
        dir = %spec.working_directory.display(),
        "Starting Gaffer"
    );

    let mut handle = ProcessHandle::from_spec(&spec)?;
    handle.start()?;

    let interrupted = tokio::select! {
        result = handle.wait_for() => {
            result?;
            false
        }
        _ = shutdown_signal() => true,
    };

    if interrupted {
        info!(process = %spec.name, "Shutting down process...");
        handle.kill();
        handle.wait_for().await?;
    }

    let lines = handle.wait_for_output_within(OUTPUT_DRAIN_TIMEOUT).await;
    let status = handle.status();
    if handle.exited_with_error() {
        warn!(process = %spec.name, status = %status, lines = ?lines, "Process exited with error");
        bail!("process '{}' {}", spec.name, status);
    }

    info!(process = %spec.name, status = %status, lines = ?lines, "Process finished");
    Ok(())
}

fn build_spec(args: Args) -> Result<ProcessSpec> {
    let mut spec = match args.config {
        Some(path) => ProcessSpec::load_from_file(&path)?,
        None => {
            let name = args.name.context("--name is required without --config")?;
            if args.command.is_empty() {
                bail!("no command given; pass it after `--`");
            }
            ProcessSpec {
                name,
                working_directory: PathBuf::from("."),
                command: args.command,
                port: args.port.unwrap_or(5000),
                environment: HashMap::new(),
            }
        }
    };

    if let Some(port) = args.port {
        spec.port = port;
    }
    if let Some(dir) = args.dir {
        spec.working_directory = dir;
    }
    spec.environment.extend(args.env);
    spec.validate()?;

    Ok(spec)
}

fn parse_env_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn initialize_logging(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    #[cfg(unix)]
    {
        let (mut sigterm, mut sigint) = match (
            signal::unix::signal(signal::unix::SignalKind::terminate()),
            signal::unix::signal(signal::unix::SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            _ => {
                warn!("Failed to install signal handlers, relying on Ctrl+C only");
                let _ = signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT signal");
            }
        }
    }

    #[cfg(windows)]
    {
        let _ = signal::ctrl_c().await;
        info!("Received Ctrl+C signal");
    }
}
