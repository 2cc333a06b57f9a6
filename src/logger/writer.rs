//! Log writer module
//!
//! Chooses the log sink: stdout, or an append-mode file. Either way output
//! goes through a non-blocking writer so request tasks never wait on I/O.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

/// Build the writer for the configured target
///
/// The returned guard flushes buffered lines when dropped and must be held
/// for the lifetime of the process.
pub fn make_writer(log_file: Option<&str>) -> io::Result<(NonBlocking, WorkerGuard)> {
    match log_file {
        Some(path) => Ok(tracing_appender::non_blocking(open_log_file(path)?)),
        None => Ok(tracing_appender::non_blocking(io::stdout())),
    }
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
