// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::spawn_connection;
use crate::config::AppState;

/// Accept connections and hand each one to its own task
///
/// Returns once `shutdown` is notified. Connections already being served keep
/// running on their tasks.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        tracing::debug!("[Connection] Accepted from: {peer_addr}");
                        spawn_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => tracing::error!("Failed to accept connection: {e}"),
                }
            }

            () = shutdown.notified() => {
                tracing::info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }
}
