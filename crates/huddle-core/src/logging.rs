//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so interactive sessions log to
//! `${HUDDLE_HOME}/logs/huddle.log` through a non-blocking writer. Scripting
//! commands log warnings to stderr so their stdout stays machine-readable.
//! `HUDDLE_LOG` overrides either default.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "HUDDLE_LOG";

const LOG_FILE_NAME: &str = "huddle.log";

const STDERR_DEFAULT_DIRECTIVE: &str = "warn";

/// Builds the filter from `HUDDLE_LOG`, falling back to `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Installs a file logger under the configured logs directory.
///
/// Keep the returned guard alive for the lifetime of the program; dropping it
/// flushes buffered lines.
///
/// # Errors
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn init_file(config: &Config) -> Result<WorkerGuard> {
    init_file_at(&paths::logs_dir(), &config.log_level)
}

/// Installs a file logger writing to `dir/huddle.log`.
///
/// # Errors
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn init_file_at(dir: &Path, default_directive: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to install log subscriber: {err}"))?;

    Ok(guard)
}

/// Installs a compact stderr logger.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(STDERR_DEFAULT_DIRECTIVE))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to install log subscriber: {err}"))
}
