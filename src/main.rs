use std::sync::Arc;
use tokio::sync::Notify;

mod api;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    let _log_guard = logger::init(&cfg.logging)?;

    let addr = cfg.get_socket_addr()?;
    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    let state = Arc::new(config::AppState::new(cfg));
    server::start_server_loop(listener, state, shutdown).await;

    tracing::info!("Server stopped");
    Ok(())
}
