// Server loop module
// Accepts connections until shutdown is signalled

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long in-flight connections get to finish after shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop until `state.shutdown` fires
///
/// Shutdown is signalled with `notify_one`, whose stored permit is picked up
/// by the next `notified()` even when it fires between loop iterations.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    let shutdown = Arc::clone(&state.shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            _ = shutdown.notified() => break,
        }
    }

    drop(listener);
    drain_connections(&state).await;
}

/// Wait for active connections to close, bounded by `DRAIN_TIMEOUT`
async fn drain_connections(state: &AppState) {
    let wait = async {
        while state.active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL).await;
        }
    };
    if tokio::time::timeout(DRAIN_TIMEOUT, wait).await.is_err() {
        logger::log_warning(&format!(
            "Shutting down with {} connections still open",
            state.active_connections.load(Ordering::SeqCst)
        ));
    }
}
