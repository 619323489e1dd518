//! Log output setup for the binary.
//!
//! Human-readable records go to stderr so they don't interleave with the
//! chat on stdout. Every record is also appended as one JSON object per line
//! to `app.log` in the log directory.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// The file records are appended to.
pub const LOG_FILE_NAME: &str = "app.log";

const DEFAULT_FILTER: &str = "info";

/// The error returned when logging cannot be set up.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file cannot be created or opened.
    #[error("failed to open log file {}: {source}", path.display())]
    OpenLogFile {
        /// The log file path.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },

    /// A global subscriber is already installed.
    #[error(transparent)]
    Init(#[from] TryInitError),
}

/// Installs the global subscriber.
///
/// The filter is read from `RUST_LOG` and falls back to `info`.
pub fn init(log_dir: &Path) -> Result<(), LoggingError> {
    let path = log_dir.join(LOG_FILE_NAME);
    let file = fs::create_dir_all(log_dir)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path))
        .map_err(|source| LoggingError::OpenLogFile {
            path: path.clone(),
            source,
        })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;

    debug!("logging to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_init() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        init(&log_dir).unwrap();
        assert!(log_dir.join(LOG_FILE_NAME).is_file());

        // Only one global subscriber can be installed.
        assert!(matches!(init(&log_dir), Err(LoggingError::Init(_))));
    }

    #[test]
    fn test_unwritable_dir() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        let err = init(&blocker.join("logs")).unwrap_err();
        assert!(matches!(err, LoggingError::OpenLogFile { .. }));
    }
}
