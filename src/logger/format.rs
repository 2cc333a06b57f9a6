//! Access log format module
//!
//! Supports three layouts:
//! - `default` (`addr method path status elapsed`)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)

use chrono::Local;
use std::time::Duration;

use crate::config::AccessLogFormat;

/// Access log entry for one completed request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Response status code
    pub status: u16,
    /// Time spent in the handler
    pub elapsed: Duration,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            status: 200,
            elapsed: Duration::ZERO,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Default => self.format_default(),
            AccessLogFormat::Common => self.format_common(),
            AccessLogFormat::Json => self.format_json(),
        }
    }

    fn format_default(&self) -> String {
        format!(
            "{} {} {} {} {:?}",
            self.remote_addr, self.method, self.path, self.status, self.elapsed
        )
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$method $path" $status -`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}\" {} -",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "status": self.status,
            "elapsed_us": u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX),
        })
        .to_string()
    }
}
