//! Logging for newsdesk.
//!
//! The configured level applies to this crate and to request tracing.
//! HTTP client and server internals stay at `warn` so a crawl of three
//! feeds does not bury the cycle summary. `RUST_LOG`, when set, replaces
//! the default directives entirely.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Targets that follow the configured level.
const CRATE_TARGETS: [&str; 2] = [env!("CARGO_CRATE_NAME"), "tower_http"];

/// Dependencies that are chatty at `debug` and below.
const QUIET_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Default filter directives for `level`.
///
/// Everything else is held at `warn`, or at `level` if that is stricter.
fn default_directives(level: &str) -> String {
    let level = parse_level(level);
    let floor = level.min(Level::WARN);
    let level = level.as_str().to_lowercase();
    let floor = floor.as_str().to_lowercase();

    let mut directives = vec![floor.clone()];
    directives.extend(CRATE_TARGETS.iter().map(|t| format!("{t}={level}")));
    directives.extend(QUIET_TARGETS.iter().map(|t| format!("{t}={floor}")));
    directives.join(",")
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Open the log file for appending, creating it and its directory.
///
/// Restarts keep earlier crawl history.
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Log to stdout and to the configured file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_file = Arc::new(open_log_file(Path::new(&config.file))?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(&config.level))
        .init();

    Ok(())
}

/// Log to stdout only. Used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(build_filter(level))
        .init();
}
