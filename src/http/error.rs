//! Translation of internal failures into HTTP error responses
//!
//! Every error response is JSON of the form
//! `{"status_code":404,"status_text":"Not Found","message":"Resource not found."}`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use thiserror::Error;

use super::response::{json_bytes_response, with_allow};
use crate::db::StoreError;

pub const MSG_BAD_REQUEST: &str = "Bad request";

/// Failures a request can end in
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or missing client input
    #[error("{0}")]
    BadRequest(String),

    /// No record matches the requested id
    #[error("Resource not found.")]
    NotFound,

    /// No route matches the request path
    #[error("Resource not found.")]
    RouteNotFound,

    /// The path matched but the method is not served there
    #[error("Method not allowed.")]
    MethodNotAllowed { allow: &'static str },

    #[error("Request entity too large.")]
    PayloadTooLarge,

    /// Storage or encoding failure, carries the underlying error text
    #[error("{0}")]
    Internal(String),
}

/// The error body itself could not be encoded
///
/// The connection layer drops the connection when it sees this.
#[derive(Debug, Error)]
#[error("failed to render error response: {0}")]
pub struct RenderError(#[from] serde_json::Error);

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status_code: u16,
    status_text: &'a str,
    message: String,
}

impl ApiError {
    /// Request body did not decode into the expected shape
    pub fn malformed_body() -> Self {
        Self::BadRequest(MSG_BAD_REQUEST.to_string())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render this error as a JSON response
    pub fn into_response(self) -> Result<Response<Full<Bytes>>, RenderError> {
        let status = self.status();
        let body = ErrorBody {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default(),
            message: self.to_string(),
        };
        let json = serde_json::to_vec(&body)?;
        let response = json_bytes_response(status, Bytes::from(json));

        Ok(match self {
            Self::MethodNotAllowed { allow } => with_allow(response, allow),
            _ => response,
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::Storage(message) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::{ALLOW, CONTENT_TYPE};
    use rstest::rstest;

    async fn render(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response().unwrap();
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[rstest]
    #[case(ApiError::malformed_body(), 400, "Bad request")]
    #[case(ApiError::BadRequest("invalid item ID".into()), 400, "invalid item ID")]
    #[case(ApiError::NotFound, 404, "Resource not found.")]
    #[case(ApiError::RouteNotFound, 404, "Resource not found.")]
    #[case(ApiError::MethodNotAllowed { allow: "GET" }, 405, "Method not allowed.")]
    #[case(ApiError::PayloadTooLarge, 413, "Request entity too large.")]
    #[case(ApiError::Internal("connection reset".into()), 500, "connection reset")]
    #[tokio::test]
    async fn test_error_mapping(
        #[case] error: ApiError,
        #[case] status: u16,
        #[case] message: &str,
    ) {
        let (actual, body) = render(error).await;
        assert_eq!(actual.as_u16(), status);
        assert_eq!(body["status_code"], status);
        assert_eq!(body["message"], message);
        assert!(body["status_text"].is_string());
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed {
            allow: "GET, PUT, DELETE",
        }
        .into_response()
        .unwrap();
        assert_eq!(response.headers()[ALLOW], "GET, PUT, DELETE");
    }

    #[test]
    fn test_store_errors() {
        assert_eq!(ApiError::from(StoreError::NotFound), ApiError::NotFound);
        assert_eq!(
            ApiError::from(StoreError::Storage("db down".into())),
            ApiError::Internal("db down".into())
        );
    }
}
