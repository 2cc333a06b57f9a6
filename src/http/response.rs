//! HTTP response building module
//!
//! Plain protocol-level responses used outside the JSON API surface.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

const NOT_FOUND_BODY: &str = "404 page not found\n";

/// Build transport-level 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from_static(NOT_FOUND_BODY.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from_static(NOT_FOUND_BODY.as_bytes())))
        })
}

/// Build 200 response carrying file content
pub fn build_file_response(data: Vec<u8>, content_type: &str) -> Response<Full<Bytes>> {
    let content_length = data.len();
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 response pointing at `location`
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    let body = format!(
        "<a href=\"{}\">Moved Permanently</a>.\n\n",
        html_escape(location)
    );
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    tracing::error!("Failed to build {status} response: {error}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_is_plain_text() {
        let response = build_404_response();
        assert_eq!(response.status(), 404);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_redirect_response() {
        let response = build_redirect_response("/greet/?a=1&b=2");
        assert_eq!(response.status(), 301);
        assert_eq!(response.headers()["Location"], "/greet/?a=1&b=2");
        assert_eq!(
            html_escape("/x?a=1&b=\"2\""),
            "/x?a=1&amp;b=&#34;2&#34;"
        );
    }

    #[test]
    fn test_file_response_headers() {
        let response = build_file_response(b"body{}".to_vec(), "text/css");
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/css");
        assert_eq!(response.headers()["Content-Length"], "6");
    }
}
