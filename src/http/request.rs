//! Request reading module
//!
//! Body collection with a size cap, query-string lookup and URL-encoded form
//! decoding.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use std::collections::HashMap;
use thiserror::Error;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Malformed URL-encoded input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid URL escape {0:?}")]
    Escape(String),
    #[error("invalid semicolon separator in query")]
    Semicolon,
}

/// Collect a request body, refusing anything larger than `limit` bytes
///
/// A declared `Content-Length` over the limit is rejected before reading.
pub async fn read_body<B>(headers: &HeaderMap, body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if declared_length(headers).is_some_and(|len| len > limit as u64) {
        return Err(BodyError::TooLarge { limit });
    }

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(BodyError::TooLarge { limit })
        }
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Whether the request declares a URL-encoded form body
pub fn is_form_body(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// First value of `key` in a query string, URL-decoded
pub fn query_value(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Decoded form fields, first occurrence wins
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    /// Merge an encoded body and a query string; body fields take precedence
    ///
    /// Both sources are validated before anything is decoded.
    pub fn parse(body: Option<&[u8]>, query: Option<&str>) -> Result<Self, FormError> {
        let sources: Vec<&[u8]> = body.into_iter().chain(query.map(str::as_bytes)).collect();
        for source in &sources {
            validate_encoding(source)?;
        }

        let mut fields = HashMap::new();
        for source in sources {
            for (key, value) in url::form_urlencoded::parse(source) {
                fields
                    .entry(key.into_owned())
                    .or_insert_with(|| value.into_owned());
            }
        }
        Ok(Self { fields })
    }

    /// Field value, or the empty string when absent
    pub fn value(&self, key: &str) -> &str {
        self.fields.get(key).map_or("", String::as_str)
    }
}

/// Reject `%` not followed by two hex digits, and `;` anywhere in a pair
fn validate_encoding(source: &[u8]) -> Result<(), FormError> {
    for pair in source.split(|&b| b == b'&') {
        if pair.contains(&b';') {
            return Err(FormError::Semicolon);
        }

        let mut rest = pair;
        while let Some(at) = rest.iter().position(|&b| b == b'%') {
            let escape = &rest[at..(at + 3).min(rest.len())];
            if escape.len() < 3 || !escape[1..].iter().all(u8::is_ascii_hexdigit) {
                return Err(FormError::Escape(String::from_utf8_lossy(escape).into_owned()));
            }
            rest = &rest[at + 3..];
        }
    }
    Ok(())
}
