//! Logging setup
//!
//! Every event goes to the console and is appended to the configured log file,
//! one line per event with timestamp, level and message.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::{AppError, AppResult};

/// Filter directive for the crate at `level`, unless `RUST_LOG` overrides it
pub fn log_filter(level: &str) -> EnvFilter {
    let level = level.to_ascii_lowercase();
    let directive = if level == "trace" {
        format!("xmltv_posters={level},reqwest=debug")
    } else {
        format!("xmltv_posters={level}")
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| directive.into())
}

/// Install the global subscriber: console plus append-only log file
pub fn init_logging(log_path: &Path, level: &str) -> AppResult<()> {
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AppError::file_access(parent, e))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| AppError::file_access(log_path, e))?;

    tracing_subscriber::registry()
        .with(log_filter(level))
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .try_init()
        .map_err(|e| AppError::configuration(format!("Logging already initialized: {e}")))?;

    Ok(())
}
