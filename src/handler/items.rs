//! Item resource handlers
//!
//! One function per verb. Each returns either the success response or an
//! `ApiError`; the router turns errors into responses, so every request gets
//! exactly one response.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Response, StatusCode};

use crate::db::ItemStore;
use crate::http::{empty_response, json_response, read_json, ApiError};
use crate::logger;
use crate::models::{ItemData, ItemId};

type HandlerResult = Result<Response<Full<Bytes>>, ApiError>;

/// `POST /items`
pub async fn create_item<B>(store: &dyn ItemStore, body: B, max_body_size: u64) -> HandlerResult
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    logger::log_item_operation("Adding new item", None);
    let data: ItemData = read_json(body, max_body_size).await?;
    let item = store.add_item(data).await?;
    json_response(StatusCode::OK, &item)
}

/// `GET /items`
pub async fn list_items(store: &dyn ItemStore) -> HandlerResult {
    logger::log_item_operation("Fetching all items", None);
    let items = store.get_all_items().await?;
    json_response(StatusCode::OK, &items)
}

/// `GET /items/{itemId}`
pub async fn get_item(store: &dyn ItemStore, id: ItemId) -> HandlerResult {
    logger::log_item_operation("Fetching item", Some(id));
    let item = store.get_item_by_id(id).await?;
    json_response(StatusCode::OK, &item)
}

/// `PUT /items/{itemId}`
///
/// The path id wins over any id in the body.
pub async fn update_item<B>(
    store: &dyn ItemStore,
    id: ItemId,
    body: B,
    max_body_size: u64,
) -> HandlerResult
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    logger::log_item_operation("Updating item", Some(id));
    let data: ItemData = read_json(body, max_body_size).await?;
    let item = store.update_item(id, data).await?;
    json_response(StatusCode::OK, &item)
}

/// `DELETE /items/{itemId}`
pub async fn delete_item(store: &dyn ItemStore, id: ItemId) -> HandlerResult {
    logger::log_item_operation("Deleting item", Some(id));
    store.delete_item(id).await?;
    Ok(empty_response(StatusCode::OK))
}
