//! Logging initialization for timeclock.
//!
//! `serve` with `logging.to_file`: logs to `<state>/logs/timeclock-{datetime}.log`
//! Everything else: logs to stderr

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set when file logging is enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Level filter, with `--debug` taking precedence over the config
fn log_level(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// Log file path for a run started now
fn log_file_name(logs_dir: &Path) -> (String, PathBuf) {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    let name = format!("timeclock-{}.log", timestamp);
    let path = logs_dir.join(&name);
    (name, path)
}

/// Initialize logging.
///
/// `long_running` is true for the REST server; only long-running commands
/// honour `logging.to_file`, one-shot CLI commands always log to stderr.
pub fn init_logging(
    config: &Config,
    long_running: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or(log_level(config, debug_override)),
    );

    if long_running && config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)?;

        let (log_filename, log_file_path) = log_file_name(&logs_dir);
        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
