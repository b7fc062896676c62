//! Persistence port for items
//!
//! Handlers only see the `ItemStore` trait. The concrete backend is picked at
//! startup from `database.backend` and shared as `Arc<dyn ItemStore>`.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Item, ItemData, ItemId};

pub use memory::InMemoryItemStore;
pub use postgres::PostgresItemStore;

/// Errors returned by an `ItemStore`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record matches the requested id.
    #[error("no matching record")]
    NotFound,

    /// The backend failed to carry out the operation.
    #[error("{0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Storage operations for items
///
/// Every call is atomic for the single record it touches. Implementations
/// handle their own internal concurrency.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Store a new item. The returned record carries the assigned id.
    async fn add_item(&self, data: ItemData) -> Result<Item, StoreError>;

    /// Read every item. Each call is a fresh read.
    async fn get_all_items(&self) -> Result<Vec<Item>, StoreError>;

    /// Returns `Err(StoreError::NotFound)` if no item has this id.
    async fn get_item_by_id(&self, id: ItemId) -> Result<Item, StoreError>;

    /// Replace the mutable fields of an existing item.
    ///
    /// Returns `Err(StoreError::NotFound)` if no item has this id.
    async fn update_item(&self, id: ItemId, data: ItemData) -> Result<Item, StoreError>;

    /// Returns `Err(StoreError::NotFound)` if no item has this id.
    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert_eq!(StoreError::from(sqlx::Error::RowNotFound), StoreError::NotFound);
    }

    #[test]
    fn test_other_sqlx_errors_map_to_storage() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Storage(ref msg) if !msg.is_empty()));
    }
}
