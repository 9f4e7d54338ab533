//! File logging.
//!
//! Logs go to a daily-rolling file rather than the terminal, which is
//! owned by the seat board. The filter defaults to `info` for this
//! workspace (or `debug` when verbose) and can be overridden with
//! `RUST_LOG`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

/// Log file name prefix. Files are named `standfirst.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "standfirst.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Keeps the background log writer alive. Dropping it flushes pending
/// records.
#[must_use = "logging stops when the guard is dropped"]
pub struct LoggingGuard {
    _worker: WorkerGuard,
    directory: PathBuf,
}

impl LoggingGuard {
    /// Directory the log files are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Default filter directives.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "standfirst=debug,standfirst_cli=debug"
    } else {
        "standfirst=info,standfirst_cli=info"
    }
}

/// Install the global subscriber writing to `directory`.
pub fn init_logging(directory: &Path, verbose: bool) -> Result<LoggingGuard, LoggingError> {
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::CreateDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // Local offset can't always be determined once threads exist; fall back to UTC.
    let timer = OffsetTime::local_rfc_3339().unwrap_or_else(|_| {
        OffsetTime::new(
            time::UtcOffset::UTC,
            time::format_description::well_known::Rfc3339,
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_timer(timer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(LoggingGuard {
        _worker: worker,
        directory: directory.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert!(default_filter(false).contains("standfirst=info"));
        assert!(default_filter(true).contains("standfirst=debug"));
    }

    #[test]
    fn test_create_dir_error_display() {
        let err = LoggingError::CreateDir {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope"));
    }

    #[test]
    fn test_init_logging_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let logs = dir.path().join("logs");

        // Another test may already own the global subscriber.
        match init_logging(&logs, false) {
            Ok(guard) => assert_eq!(guard.directory(), logs.as_path()),
            Err(LoggingError::Install(_)) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
        assert!(logs.is_dir());
    }
}
