// Server module entry point
// Listener setup, accept loop, per-connection serving and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::{start_server_loop, wait_for_connections};
pub use signal::{start_signal_handler, ShutdownSignal};

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::AppState;
use crate::logger;

/// Serve the item API on `listener` until `shutdown` flips.
///
/// After the flag flips no new connections are accepted; open ones finish
/// their in-flight request and close. Waiting is bounded by
/// `performance.shutdown_grace_period` seconds.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let grace = Duration::from_secs(state.config.performance.shutdown_grace_period);

    start_server_loop(listener, state, Arc::clone(&active_connections), shutdown).await?;

    let remaining = wait_for_connections(&active_connections, grace).await;
    logger::log_shutdown_complete(remaining);
    Ok(())
}
