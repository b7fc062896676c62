//! Logger module
//!
//! Provides logging utilities for the item server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support
//!
//! Events are emitted through `tracing`; `writer::init` installs the
//! subscriber that routes them.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use crate::models::ItemId;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        &config.logging.level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Started server on {addr}");
    tracing::info!(
        backend = ?config.database.backend,
        log_level = %config.logging.level,
        max_body_size = config.http.max_body_size,
        "Serving /items"
    );
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.access_log_file {
        tracing::info!("Access log: {path}");
    }
    if let Some(ref path) = config.logging.error_log_file {
        tracing::info!("Error log: {path}");
    }
}

pub fn log_store_ready(description: &str) {
    tracing::info!("Item store ready: {description}");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_debug(message: &str) {
    tracing::debug!("{message}");
}

pub fn log_item_operation(action: &str, id: Option<ItemId>) {
    match id {
        Some(id) => tracing::debug!(item_id = id.get(), "{action}..."),
        None => tracing::debug!("{action}..."),
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: writer::ACCESS_TARGET, "{}", entry.format(format));
}

pub fn log_shutdown_started(signal: &str) {
    tracing::info!("{signal} received, stopping API server");
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        tracing::info!("Server stopped");
    } else {
        tracing::warn!("Server stopped with {remaining} connection(s) still open");
    }
}
