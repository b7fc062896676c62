//! HTTP response building module
//!
//! Builders for the JSON and empty responses the item API produces,
//! decoupled from specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::error::ApiError;

pub const APPLICATION_JSON: &str = "application/json";

/// Serialize `body` and build a JSON response
///
/// A serialization failure comes back as an `ApiError` so the caller can
/// still answer with an error response.
pub fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let json = serde_json::to_vec(body).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(json_bytes_response(status, Bytes::from(json)))
}

/// Build a JSON response from an already encoded body
pub fn json_bytes_response(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, APPLICATION_JSON)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            fallback(status)
        })
}

/// Build a response with no body
pub fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            fallback(status)
        })
}

/// Attach an `Allow` header listing the supported methods
pub fn with_allow(mut response: Response<Full<Bytes>>, allow: &'static str) -> Response<Full<Bytes>> {
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(allow));
    response
}

fn fallback(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
