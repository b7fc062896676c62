//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for route matching,
//! id validation and dispatching to the item handlers.
//!
//! | Method | Path              | Handler       |
//! |--------|-------------------|---------------|
//! | GET    | `/items`          | `list_items`  |
//! | POST   | `/items`          | `create_item` |
//! | GET    | `/items/{itemId}` | `get_item`    |
//! | PUT    | `/items/{itemId}` | `update_item` |
//! | DELETE | `/items/{itemId}` | `delete_item` |

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::items;
use super::validator::item_context;
use crate::config::AppState;
use crate::http::{ApiError, RenderError};
use crate::logger::{self, AccessLogEntry};

const COLLECTION: &str = "items";
const COLLECTION_METHODS: &str = "GET, POST";
const MEMBER_METHODS: &str = "GET, PUT, DELETE";

/// A matched route, item routes carry the raw `{itemId}` segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    ListItems,
    CreateItem,
    GetItem(&'a str),
    UpdateItem(&'a str),
    DeleteItem(&'a str),
}

/// Main entry point for HTTP request handling
///
/// Returns `Err` only when not even an error response can be produced, in
/// which case the connection is closed without a body.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, RenderError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();

    let mut response = match dispatch(&parts.method, path, body, &state).await {
        Ok(response) => response,
        Err(e) => {
            logger::log_error(&format!("{} {path}: {e}", parts.method));
            return Err(e);
        }
    };

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if state.access_log_enabled() {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            parts.method.to_string(),
            path.to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = header_string(&parts.headers, REFERER);
        entry.user_agent = header_string(&parts.headers, USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request and render whatever the handler produced
pub async fn dispatch<B>(
    method: &Method,
    path: &str,
    body: B,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RenderError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match route_request(method, path, body, state).await {
        Ok(response) => Ok(response),
        Err(error) => {
            if error.status().is_server_error() {
                logger::log_error(&format!("{method} {path} failed: {error}"));
            }
            error.into_response()
        }
    }
}

async fn route_request<B>(
    method: &Method,
    path: &str,
    body: B,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let store = state.store.as_ref();
    let max_body_size = state.config.http.max_body_size;

    match match_route(method, path)? {
        Route::ListItems => items::list_items(store).await,
        Route::CreateItem => items::create_item(store, body, max_body_size).await,
        Route::GetItem(raw) => items::get_item(store, item_context(raw)?).await,
        Route::UpdateItem(raw) => {
            items::update_item(store, item_context(raw)?, body, max_body_size).await
        }
        Route::DeleteItem(raw) => items::delete_item(store, item_context(raw)?).await,
    }
}

/// Match method and path against the item routes
///
/// One trailing slash is tolerated. A known path with an unsupported method
/// is `MethodNotAllowed`, anything else is `RouteNotFound`.
pub fn match_route<'a>(method: &Method, path: &'a str) -> Result<Route<'a>, ApiError> {
    let trimmed = match path.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest,
        _ => path,
    };
    let mut segments = trimmed
        .strip_prefix('/')
        .ok_or(ApiError::RouteNotFound)?
        .split('/');

    match (segments.next(), segments.next(), segments.next()) {
        (Some(COLLECTION), None, None) => match *method {
            Method::GET => Ok(Route::ListItems),
            Method::POST => Ok(Route::CreateItem),
            _ => Err(ApiError::MethodNotAllowed {
                allow: COLLECTION_METHODS,
            }),
        },
        (Some(COLLECTION), Some(id), None) => match *method {
            Method::GET => Ok(Route::GetItem(id)),
            Method::PUT => Ok(Route::UpdateItem(id)),
            Method::DELETE => Ok(Route::DeleteItem(id)),
            _ => Err(ApiError::MethodNotAllowed {
                allow: MEMBER_METHODS,
            }),
        },
        _ => Err(ApiError::RouteNotFound),
    }
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn header_string(headers: &hyper::HeaderMap, name: hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
