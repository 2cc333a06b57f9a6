//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Routes live in one declarative
//! table; each entry names its path pattern, method policy and endpoint.

use crate::api::{self, handlers};
use crate::config::AppState;
use crate::error::ApiError;
use crate::handler::static_files;
use crate::http;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

/// How a route matches the request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    Exact(&'static str),
    Prefix(&'static str),
}

impl PathPattern {
    pub fn matches(self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => path.starts_with(prefix),
        }
    }
}

/// Which methods a route accepts and how it rejects the rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPolicy {
    Any,
    Only {
        method: &'static str,
        rejection: StatusCode,
        message: &'static str,
    },
}

impl MethodPolicy {
    fn check(self, method: &str) -> Result<(), ApiError> {
        match self {
            Self::Any => Ok(()),
            Self::Only { method: allowed, .. } if method == allowed => Ok(()),
            Self::Only {
                method: allowed,
                rejection,
                message,
            } => Err(ApiError::MethodNotAllowed {
                status: rejection,
                message,
                allow: allowed,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Root,
    Hello,
    Greet,
    Person,
    Register,
    Search,
    FormSubmit,
    Static,
    /// Permanent redirect to the given path, query preserved
    Redirect(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub pattern: PathPattern,
    pub methods: MethodPolicy,
    pub endpoint: Endpoint,
}

const GREET_PREFIX: &str = "/greet/";
const STATIC_PREFIX: &str = "/static/";

const fn route(pattern: PathPattern, endpoint: Endpoint) -> Route {
    Route {
        pattern,
        methods: MethodPolicy::Any,
        endpoint,
    }
}

const fn post_only(
    pattern: PathPattern,
    endpoint: Endpoint,
    rejection: StatusCode,
    message: &'static str,
) -> Route {
    Route {
        pattern,
        methods: MethodPolicy::Only {
            method: "POST",
            rejection,
            message,
        },
        endpoint,
    }
}

/// Route table, matched in order: exact paths, then prefixes, then the root
pub const ROUTES: &[Route] = &[
    route(PathPattern::Exact("/hello"), Endpoint::Hello),
    route(PathPattern::Exact("/api/person"), Endpoint::Person),
    post_only(
        PathPattern::Exact("/api/register"),
        Endpoint::Register,
        StatusCode::METHOD_NOT_ALLOWED,
        "method not allowed",
    ),
    route(PathPattern::Exact("/api/search"), Endpoint::Search),
    // Rejected methods answer 400 here, unlike /api/register
    post_only(
        PathPattern::Exact("/api/form-submit"),
        Endpoint::FormSubmit,
        StatusCode::BAD_REQUEST,
        "request method not allowed",
    ),
    // Subtree roots without the trailing slash
    route(PathPattern::Exact("/greet"), Endpoint::Redirect(GREET_PREFIX)),
    route(PathPattern::Exact("/static"), Endpoint::Redirect(STATIC_PREFIX)),
    route(PathPattern::Prefix(GREET_PREFIX), Endpoint::Greet),
    route(PathPattern::Prefix(STATIC_PREFIX), Endpoint::Static),
    route(PathPattern::Exact("/"), Endpoint::Root),
];

/// Find the first matching route for a given path
pub fn match_route(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.pattern.matches(path))
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let result = match match_route(req.uri().path()) {
        Some(route) => match route.methods.check(req.method().as_str()) {
            Ok(()) => dispatch(route.endpoint, req, &state).await,
            Err(e) => Err(e),
        },
        None => Err(ApiError::NotFound),
    };

    let mut response = result.unwrap_or_else(|err| {
        if err.status().is_server_error() {
            tracing::error!("{err}");
        } else {
            tracing::debug!("rejected request: {err}");
        }
        api::error_response(&err)
    });

    match HeaderValue::from_str(&state.config.http.server_name) {
        Ok(value) => {
            response.headers_mut().insert(SERVER, value);
        }
        Err(e) => tracing::warn!("Invalid server name header: {e}"),
    }

    Ok(response)
}

/// Dispatch to specific endpoint handler
async fn dispatch<B>(
    endpoint: Endpoint,
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let config = &state.config;
    match endpoint {
        Endpoint::Root => Ok(static_files::serve_index(&config.static_files).await),
        Endpoint::Hello => Ok(handlers::hello()),
        Endpoint::Greet => Ok(handlers::greet(req.uri().path())),
        Endpoint::Person => handlers::get_person(),
        Endpoint::Register => handlers::register(req, config.http.max_body_size).await,
        Endpoint::Search => handlers::search(req.uri().query()),
        Endpoint::FormSubmit => handlers::form_submit(req, config.http.max_body_size).await,
        Endpoint::Static => Ok(static_files::serve_directory(
            &config.static_files,
            req.uri().path(),
            STATIC_PREFIX,
        )
        .await),
        Endpoint::Redirect(target) => {
            let location = match req.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => target.to_string(),
            };
            Ok(http::build_redirect_response(&location))
        }
    }
}
