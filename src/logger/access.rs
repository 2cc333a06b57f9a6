//! Access logging service wrapper
//!
//! Decorates the request service: the status of the response the inner
//! service produced is recorded together with method, path, client address and
//! elapsed time. The response itself passes through untouched.

use hyper::service::Service;
use hyper::{Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Instant;

use super::AccessLogEntry;
use crate::config::AccessLogFormat;

/// Status logged when the inner service fails without a response
const FAILED_STATUS: u16 = 500;

#[derive(Debug, Clone)]
pub struct AccessLog<S> {
    inner: S,
    remote_addr: SocketAddr,
    format: AccessLogFormat,
    enabled: bool,
}

impl<S> AccessLog<S> {
    pub const fn new(
        inner: S,
        remote_addr: SocketAddr,
        format: AccessLogFormat,
        enabled: bool,
    ) -> Self {
        Self {
            inner,
            remote_addr,
            format,
            enabled,
        }
    }
}

impl<S, B, ResBody> Service<Request<B>> for AccessLog<S>
where
    S: Service<Request<B>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: 'static,
    ResBody: 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let start = Instant::now();
        let mut entry = AccessLogEntry::new(
            self.remote_addr.to_string(),
            req.method().to_string(),
            req.uri().path().to_string(),
        );
        let format = self.format;
        let enabled = self.enabled;
        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;
            if enabled {
                entry.status = result
                    .as_ref()
                    .map_or(FAILED_STATUS, |resp| resp.status().as_u16());
                entry.elapsed = start.elapsed();
                tracing::info!(target: "access", "{}", entry.format(format));
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::service::service_fn;
    use hyper::StatusCode;
    use std::convert::Infallible;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    /// Shared buffer the test subscriber writes into
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            let raw = self.0.lock().unwrap().clone();
            String::from_utf8(raw)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    /// Send one request through the wrapper and return the emitted log lines
    async fn logged_lines<S>(svc: AccessLog<S>, req: Request<Full<Bytes>>) -> Vec<String>
    where
        S: Service<Request<Full<Bytes>>, Response = Response<Full<Bytes>>>,
        S::Future: Send + 'static,
        S::Error: 'static,
    {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let _ = svc.call(req).await;
        captured.lines()
    }

    fn register_request() -> Request<Full<Bytes>> {
        Request::post("/api/register")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_passes_response_through() {
        let inner = service_fn(|_req: Request<Full<Bytes>>| async {
            let mut resp = Response::new(Full::new(Bytes::from_static(b"created")));
            *resp.status_mut() = StatusCode::CREATED;
            Ok::<_, Infallible>(resp)
        });
        let svc = AccessLog::new(inner, peer(), AccessLogFormat::Default, true);

        let req = Request::post("/api/register")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = svc.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"created");
    }

    #[tokio::test]
    async fn test_default_status_is_ok() {
        let inner = service_fn(|_req: Request<Full<Bytes>>| async {
            Ok::<_, Infallible>(Response::new(Full::new(Bytes::from_static(b"hi"))))
        });
        let svc = AccessLog::new(inner, peer(), AccessLogFormat::Json, false);

        let req = Request::get("/hello").body(Full::new(Bytes::new())).unwrap();
        let resp = svc.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_one_line_per_request_with_status() {
        let inner = service_fn(|_req: Request<Full<Bytes>>| async {
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = StatusCode::CREATED;
            Ok::<_, Infallible>(resp)
        });
        let svc = AccessLog::new(inner, peer(), AccessLogFormat::Default, true);

        let lines = logged_lines(svc, register_request()).await;
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(
            lines[0].contains("127.0.0.1:40000 POST /api/register 201 "),
            "{}",
            lines[0]
        );
    }

    #[tokio::test]
    async fn test_unset_status_logged_as_200() {
        let inner = service_fn(|_req: Request<Full<Bytes>>| async {
            Ok::<_, Infallible>(Response::new(Full::new(Bytes::from_static(b"hi"))))
        });
        let svc = AccessLog::new(inner, peer(), AccessLogFormat::Default, true);

        let req = Request::get("/hello").body(Full::new(Bytes::new())).unwrap();
        let lines = logged_lines(svc, req).await;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("GET /hello 200 "), "{}", lines[0]);
    }

    #[tokio::test]
    async fn test_inner_failure_logged_as_500() {
        let inner = service_fn(|_req: Request<Full<Bytes>>| async {
            Err::<Response<Full<Bytes>>, _>(io::Error::other("boom"))
        });
        let svc = AccessLog::new(inner, peer(), AccessLogFormat::Default, true);

        let lines = logged_lines(svc, register_request()).await;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("POST /api/register 500 "), "{}", lines[0]);
    }

    #[tokio::test]
    async fn test_disabled_wrapper_logs_nothing() {
        let inner = service_fn(|_req: Request<Full<Bytes>>| async {
            Ok::<_, Infallible>(Response::new(Full::new(Bytes::new())))
        });
        let svc = AccessLog::new(inner, peer(), AccessLogFormat::Default, false);

        assert!(logged_lines(svc, register_request()).await.is_empty());
    }
}
