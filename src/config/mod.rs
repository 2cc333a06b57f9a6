// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{AccessLogFormat, Config, LoggingConfig, StaticConfig};
use types::{HttpConfig, ServerConfig};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "HELLO_API_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config";
const ENV_PREFIX: &str = "HELLO_API";

impl Config {
    /// Load configuration from `HELLO_API_CONFIG` or `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    ///
    /// Priority, lowest first: defaults, the file, `HELLO_API_*` variables
    /// (`HELLO_API_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            http: HttpConfig {
                server_name: "hello_api".to_string(),
                max_body_size: 1_048_576, // 1MB
            },
            static_files: StaticConfig {
                dir: "static".to_string(),
                index_file: "index.html".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: true,
                access_log_format: AccessLogFormat::Default,
                log_file: None,
            },
        }
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    let defaults = Config::default();
    builder
        .set_default("server.host", defaults.server.host)?
        .set_default("server.port", i64::from(defaults.server.port))?
        .set_default("http.server_name", defaults.http.server_name)?
        .set_default("http.max_body_size", defaults.http.max_body_size as u64)?
        .set_default("static_files.dir", defaults.static_files.dir)?
        .set_default("static_files.index_file", defaults.static_files.index_file)?
        .set_default("logging.level", defaults.logging.level)?
        .set_default("logging.access_log", defaults.logging.access_log)?
        .set_default("logging.access_log_format", "default")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely/not/here").unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.static_files.dir, "static");
        assert_eq!(cfg.logging.access_log_format, AccessLogFormat::Default);
        assert!(cfg.logging.log_file.is_none());
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[logging]\naccess_log_format = \"json\"\n"
        )
        .unwrap();

        let cfg = Config::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.logging.access_log_format, AccessLogFormat::Json);
    }

    #[test]
    fn test_invalid_address() {
        let mut cfg = Config::default();
        cfg.server.host = "not an ip".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
