// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub static_files: StaticConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    /// Largest accepted request body in bytes
    pub max_body_size: usize,
}

/// Static asset configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StaticConfig {
    /// Directory served under `/static/`
    pub dir: String,
    /// File served for `/` and for directory requests
    pub index_file: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Tracing filter directive, `RUST_LOG` takes precedence when set
    pub level: String,
    pub access_log: bool,
    pub access_log_format: AccessLogFormat,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Access log line layout
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessLogFormat {
    /// `addr method path status elapsed`
    Default,
    /// Common Log Format
    Common,
    /// One JSON object per line
    Json,
}
