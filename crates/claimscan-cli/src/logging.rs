//! Tracing subscriber setup.

use crate::error::{CliError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr only (level from `RUST_LOG`, default `info`).
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))
}

/// Log to stderr and to `<logs_dir>/<run_id>.log`.
///
/// Returns the path of the log file.
pub fn init_with_file(logs_dir: &Path, run_id: &str) -> Result<PathBuf> {
    fs::create_dir_all(logs_dir)?;
    let path = logs_dir.join(format!("{}.log", run_id));
    let file = File::create(&path)?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(path)
}
