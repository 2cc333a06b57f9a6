//! Client-facing request errors
//!
//! Each variant's display text is the `message` of the JSON error body.

use hyper::StatusCode;
use thiserror::Error;

/// Detail text attached to every not-found error
pub const NOT_FOUND_DETAILS: &str = "the requested resource was not found";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    /// Wrong HTTP method. The status differs per route.
    #[error("{message}")]
    MethodNotAllowed {
        status: StatusCode,
        message: &'static str,
        allow: &'static str,
    },

    #[error("Invalid request payload")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Invalid request payload")]
    UnreadableBody(String),

    #[error("Name and age are required fields")]
    MissingPersonFields,

    #[error("Missing query string")]
    MissingQuery,

    #[error("Invalid 'limit' parameter")]
    InvalidLimit(#[from] std::num::ParseIntError),

    #[error("error parsing form data")]
    FormParse(String),

    #[error("username and password are required")]
    MissingCredentials,

    #[error("request body too large")]
    PayloadTooLarge { limit: usize },

    #[error("Internal server error")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { status, .. } => *status,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidPayload(_)
            | Self::UnreadableBody(_)
            | Self::MissingPersonFields
            | Self::MissingQuery
            | Self::InvalidLimit(_)
            | Self::FormParse(_)
            | Self::MissingCredentials => StatusCode::BAD_REQUEST,
        }
    }

    /// Optional elaboration for the error body
    pub fn details(&self) -> Option<String> {
        match self {
            Self::NotFound => Some(NOT_FOUND_DETAILS.to_string()),
            Self::PayloadTooLarge { limit } => Some(format!("the limit is {limit} bytes")),
            Self::UnreadableBody(reason) | Self::FormParse(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Value for the `Allow` header, only set on method errors
    pub const fn allow(&self) -> Option<&'static str> {
        match self {
            Self::MethodNotAllowed { allow, .. } => Some(*allow),
            _ => None,
        }
    }
}
