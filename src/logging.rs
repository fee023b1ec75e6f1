//! Tracing setup.
//!
//! Events go to a daily-rolling `charges.log` under the configured log
//! directory when it can be opened. The interactive form must not write to
//! stderr (it owns the alternate screen), so stderr output is opt-in for the
//! one-shot commands.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::error::AppError;

const LOG_FILE: &str = "charges.log";

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered lines are flushed.
///
/// An unusable log directory is not fatal: a warning is printed and events
/// only reach stderr (if enabled).
pub fn init_tracing(log_dir: &Path, log_to_stderr: bool) -> Result<Option<WorkerGuard>, AppError> {
    let (file_layer, file_guard) = match open_file_writer(log_dir) {
        Ok((writer, guard)) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        Err(err) => {
            eprintln!("Warning: {err} Continuing without a log file.");
            (None, None)
        }
    };

    let stderr_layer = log_to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| AppError::new(2, format!("Failed to initialize logging: {e}")))?;

    Ok(file_guard)
}

fn open_file_writer(log_dir: &Path) -> Result<(NonBlocking, WorkerGuard), AppError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        AppError::new(2, format!("Failed to create log dir {}: {e}.", log_dir.display()))
    })?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE)
        .build(log_dir)
        .map_err(|e| AppError::new(2, format!("Failed to open log file in {}: {e}.", log_dir.display())))?;
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_is_created_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("nested").join("logs");

        let opened = open_file_writer(&log_dir);
        assert!(opened.is_ok());
        assert!(log_dir.is_dir());
    }

    #[test]
    fn log_dir_under_a_regular_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = open_file_writer(&blocker.join("logs")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Failed to create log dir"), "{}", err.message());
    }
}
