// 📝 Logging - tracing subscriber setup
// Never writes to stdout, which belongs to CLI output and the terminal UI

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; used while the terminal UI owns the screen
    File(PathBuf),
}

/// Install the subscriber once. `None` leaves logging off entirely.
pub fn init_logging(filter: Option<&str>, target: &LogTarget) -> Result<()> {
    let Some(filter) = filter else {
        return Ok(());
    };

    let file = match target {
        LogTarget::Stderr => None,
        LogTarget::File(path) => Some(open_log_file(path)?),
    };

    INIT.call_once(|| {
        let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
        let registry = tracing_subscriber::registry().with(filter_layer);

        let _ = match file {
            Some(file) => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .try_init(),
            None => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init(),
        };
    });

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Verbose subscriber for tests; safe to call from every test
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_off_without_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpa.log");

        init_logging(None, &LogTarget::File(path.clone())).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("gpa.log");

        assert!(init_logging(Some("debug"), &LogTarget::File(path)).is_err());
    }
}
