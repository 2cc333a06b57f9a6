// Connection handling module
// Serves one accepted TCP connection on its own task

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger::{self, AccessLog};

/// Serve a single connection in a spawned task.
///
/// Every request on the connection goes through the access log wrapper and
/// then the router. Requests on different connections run concurrently and
/// share nothing but the read-only state.
pub fn spawn_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let logging = &state.config.logging;

        let router_state = Arc::clone(&state);
        let router = service_fn(move |req: Request<Incoming>| {
            handler::handle_request(req, Arc::clone(&router_state))
        });
        let service = AccessLog::new(
            router,
            peer_addr,
            logging.access_log_format,
            logging.access_log,
        );

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
