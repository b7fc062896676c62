//! Log writer module
//!
//! Installs the global `tracing` subscriber. Access log lines (emitted on
//! `ACCESS_TARGET`) go to the access log file or stdout; everything else goes
//! to the error log file or stderr.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::filter::{filter_fn, EnvFilter, FilterExt};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

/// Target used for access log events
pub const ACCESS_TARGET: &str = "bucketeer::access";

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
}

/// Initialize the global subscriber
///
/// Returns an error if a log file cannot be opened or a subscriber is
/// already installed.
pub fn init(
    level: &str,
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<()> {
    build_subscriber(level, access_log_file, error_log_file)?
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

/// Build the subscriber without installing it
///
/// `level` (or `RUST_LOG`, which takes precedence) only applies to
/// application events. Access lines are written whenever they are emitted;
/// `logging.access_log` is the switch for them.
fn build_subscriber(
    level: &str,
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<impl Subscriber + Send + Sync + 'static> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let access_layer = tracing_subscriber::fmt::layer()
        .with_writer(make_writer(access_log_file, LogTarget::Stdout)?)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(filter_fn(|meta| meta.target() == ACCESS_TARGET));

    let app_layer = tracing_subscriber::fmt::layer()
        .with_writer(make_writer(error_log_file, LogTarget::Stderr)?)
        .with_ansi(error_log_file.is_none())
        .with_filter(filter_fn(|meta| meta.target() != ACCESS_TARGET).and(env_filter));

    Ok(tracing_subscriber::registry()
        .with(access_layer)
        .with(app_layer))
}

fn make_writer(path: Option<&str>, fallback: LogTarget) -> io::Result<BoxMakeWriter> {
    Ok(match (path, fallback) {
        (Some(path), _) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
        (None, LogTarget::Stdout) => BoxMakeWriter::new(io::stdout),
        (None, LogTarget::Stderr) => BoxMakeWriter::new(io::stderr),
    })
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/access.log");
        let path = path.to_str().unwrap();
        open_log_file(path).unwrap();
        assert!(Path::new(path).exists());
    }

    #[test]
    fn test_access_lines_ignore_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let access_path = dir.path().join("access.log");
        let error_path = dir.path().join("error.log");
        let subscriber = build_subscriber(
            "warn",
            access_path.to_str(),
            error_path.to_str(),
        )
        .unwrap();

        let entry = crate::logger::AccessLogEntry::new(
            "127.0.0.1".into(),
            "GET".into(),
            "/items".into(),
        );
        tracing::subscriber::with_default(subscriber, || {
            crate::logger::log_access(&entry, "common");
            tracing::info!("store ready");
            tracing::warn!("slow store");
        });

        let access = std::fs::read_to_string(&access_path).unwrap();
        assert!(access.contains("\"GET /items HTTP/1.1\" 200 0"), "got: {access}");

        let errors = std::fs::read_to_string(&error_path).unwrap();
        assert!(errors.contains("slow store"), "got: {errors}");
        assert!(!errors.contains("store ready"));
        assert!(!errors.contains("/items"));
    }

    #[test]
    fn test_make_writer_rejects_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a log file
        let path = dir.path().to_str().unwrap();
        assert!(make_writer(Some(path), LogTarget::Stderr).is_err());
    }
}
