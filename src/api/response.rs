// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::types::ErrorResponse;
use crate::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build JSON response
///
/// The body is terminated by a newline. Serialization failures are returned
/// to the caller so it can decide how to report them.
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Full<Bytes>>, serde_json::Error> {
    let mut json = serde_json::to_vec(body)?;
    json.push(b'\n');
    Ok(build(status, JSON_CONTENT_TYPE, Bytes::from(json)))
}

/// Build plain-text response
pub fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    build(status, TEXT_CONTENT_TYPE, body.into())
}

/// Build structured JSON error response
///
/// Falls back to a plain-text 500 when the error body cannot be serialized.
pub fn send_json_error(
    message: &str,
    status: StatusCode,
    details: Option<&str>,
) -> Response<Full<Bytes>> {
    let body = ErrorResponse::new(message, status.as_u16(), details);
    json_response(status, &body).unwrap_or_else(|e| {
        tracing::error!("failed to write error response: {e}");
        internal_error_fallback()
    })
}

/// Render an `ApiError` through the structured error helper
pub fn error_response(err: &ApiError) -> Response<Full<Bytes>> {
    let mut response = send_json_error(&err.to_string(), err.status(), err.details().as_deref());
    if let Some(allow) = err.allow() {
        if response.status() == err.status() {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
        }
    }
    response
}

/// Minimal plain-text 500
pub fn internal_error_fallback() -> Response<Full<Bytes>> {
    text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error\n")
}

fn build(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
