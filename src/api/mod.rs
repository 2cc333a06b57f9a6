// API module entry
// JSON and plain-text endpoints, their payload types and response helpers

pub mod handlers;
mod response;
mod types;

// Re-export public types
pub use response::*;
