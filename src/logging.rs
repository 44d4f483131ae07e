//! Sets up the global `tracing` subscriber.
//!
//! Verbosity comes from `RUST_LOG` (default `info`). Events go to stderr so they do not
//! interleave with command output on stdout, either human-readable or as JSON lines, and
//! optionally also to a daily rolling file.

use crate::config::{Config, LogFormat};
use crate::error::{AppError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "naqi-calc.log";

/// Installs the subscriber described by `config`.
///
/// The returned guard flushes the file writer on drop and must be kept alive for as long
/// as logging is needed, typically for the whole of `main`.
///
/// # Errors
///
/// Returns `AppError::Config` if a global subscriber is already installed.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (json_layer, pretty_layer) = match config.log_format {
        LogFormat::Json => (Some(fmt::layer().json().with_writer(std::io::stderr)), None),
        LogFormat::Pretty => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("failed to initialise logging: {e}")))?;

    Ok(guard)
}
