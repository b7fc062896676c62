// Server loop module
// Accepts connections until shutdown, then waits for open connections to drain

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::accept_connection;
use super::signal::shutdown_requested;
use crate::config;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections on `listener` until the shutdown flag flips.
///
/// The listener is dropped on return, so no new connections are taken
/// while the existing ones drain.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let conn_shutdown = shutdown.clone();
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            conn_shutdown.clone(),
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown_requested(&mut shutdown) => {
                return Ok(());
            }
        }
    }
}

/// Wait until every connection task has finished or `grace` elapses.
///
/// Returns the number of connections still open when waiting stopped.
pub async fn wait_for_connections(active_connections: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 || tokio::time::Instant::now() >= deadline {
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
