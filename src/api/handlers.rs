// Endpoint handlers module
// Each handler turns one request into one response; nothing is kept between calls

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};

use super::response::{json_response, text_response};
use super::types::Person;
use crate::error::ApiError;
use crate::http::{self, BodyError, FormData};

type HandlerResult = Result<Response<Full<Bytes>>, ApiError>;

const GREET_PREFIX: &str = "/greet/";
const DEFAULT_GUEST: &str = "Guest";

/// `GET /hello`
pub fn hello() -> Response<Full<Bytes>> {
    text_response(StatusCode::OK, "hello there!")
}

/// `GET /greet/<name>`
pub fn greet(path: &str) -> Response<Full<Bytes>> {
    let raw = path.strip_prefix(GREET_PREFIX).unwrap_or_default();
    let name = urlencoding::decode(raw).map_or_else(|_| raw.into(), |n| n);
    let name = if name.is_empty() { DEFAULT_GUEST } else { &*name };
    text_response(StatusCode::OK, format!("Greetings {name}!"))
}

/// `GET /api/person`
pub fn get_person() -> HandlerResult {
    json_response(StatusCode::OK, &Person::example()).map_err(|e| {
        tracing::error!("Error encoding json {e}");
        ApiError::Serialization(e)
    })
}

/// `POST /api/register`
///
/// Validates a JSON person; registration is simulated, nothing is stored.
pub async fn register<B>(req: Request<B>, max_body_size: usize) -> HandlerResult
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let bytes = http::read_body(&parts.headers, body, max_body_size)
        .await
        .map_err(|e| body_error(e, ApiError::UnreadableBody))?;

    let person: Person = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!("Error decoding JSON request body: {e}");
        ApiError::InvalidPayload(e)
    })?;

    if !person.has_required_fields() {
        return Err(ApiError::MissingPersonFields);
    }

    tracing::info!(
        "Received new person: Name = {}, Age = {}, City = {}, Is Student? = {}",
        person.name,
        person.age,
        person.city.as_deref().unwrap_or_default(),
        person.is_student,
    );

    Ok(text_response(
        StatusCode::CREATED,
        format!("Person {} was successfully created.\n", person.name),
    ))
}

/// `GET /api/search?query=..&limit=..`
pub fn search(query: Option<&str>) -> HandlerResult {
    let term = http::query_value(query, "query")
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::MissingQuery)?;

    let limit = match http::query_value(query, "limit").filter(|l| !l.is_empty()) {
        Some(raw) => raw.parse::<i64>()?,
        None => 0,
    };

    Ok(text_response(
        StatusCode::OK,
        format!("searching for: '{term}' with a limit of {limit} results"),
    ))
}

/// `POST /api/form-submit`
///
/// The password is required but never logged.
pub async fn form_submit<B>(req: Request<B>, max_body_size: usize) -> HandlerResult
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let bytes = http::read_body(&parts.headers, body, max_body_size)
        .await
        .map_err(|e| {
            tracing::warn!("Error parsing form data {e}");
            body_error(e, ApiError::FormParse)
        })?;

    let form_body = http::is_form_body(&parts.headers).then_some(&bytes[..]);
    let form = FormData::parse(form_body, parts.uri.query()).map_err(|e| {
        tracing::warn!("Error parsing form data {e}");
        ApiError::FormParse(e.to_string())
    })?;

    let username = form.value("username");
    let password = form.value("password");
    let email = form.value("email");

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::MissingCredentials);
    }

    tracing::info!("received form submission: username={username}, email={email}.");

    Ok(text_response(
        StatusCode::OK,
        format!("form submitted successfully! welcome, {username}"),
    ))
}

fn body_error(err: BodyError, on_read: fn(String) -> ApiError) -> ApiError {
    match err {
        BodyError::TooLarge { limit } => ApiError::PayloadTooLarge { limit },
        BodyError::Read(msg) => on_read(msg),
    }
}
