// Application state module
// Read-only state shared by every request

use super::types::Config;

/// Application state
///
/// Handlers only read from it; nothing is written after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}
