//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Subscriber setup with level filtering
//! - Access logging with multiple formats
//! - File-based logging support

mod access;
mod format;
pub mod writer;

pub use access::AccessLog;
pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` overrides the
/// configured level.
pub fn init(config: &LoggingConfig) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;
    let (writer, guard) = writer::make_writer(config.log_file.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(config.log_file.is_none())
        .try_init()
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    Ok(guard)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Starting server on port {}", addr.port());
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Static files: {}", config.static_files.dir);
    tracing::info!(
        "Access log: {} ({:?})",
        if config.logging.access_log { "on" } else { "off" },
        config.logging.access_log_format
    );
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}
