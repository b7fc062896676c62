//! `PostgreSQL` item store
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS items (
//!     id BIGSERIAL PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     description TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Every operation is a single statement, so each is atomic on its own. Not
//! found is detected from `RETURNING` / `rows_affected()` without a second
//! round trip.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};

use super::{ItemStore, StoreError};
use crate::config::DatabaseConfig;
use crate::models::{Item, ItemData, ItemId};

const CREATE_ITEMS_TABLE: &str = "CREATE TABLE IF NOT EXISTS items (\
     id BIGSERIAL PRIMARY KEY, \
     name TEXT NOT NULL, \
     description TEXT NOT NULL, \
     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW())";

#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: ItemId::new(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// `PostgreSQL` implementation of `ItemStore` over a connection pool
#[derive(Debug, Clone)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from the configured connection parameters
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Create the `items` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ITEMS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn add_item(&self, data: ItemData) -> Result<Item, StoreError> {
        let row: ItemRow = sqlx::query_as(
            "INSERT INTO items (name, description) VALUES ($1, $2) \
             RETURNING id, name, description, created_at",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| StoreError::Storage(error.to_string()))?;

        Ok(row.into())
    }

    async fn get_all_items(&self) -> Result<Vec<Item>, StoreError> {
        let rows: Vec<ItemRow> =
            sqlx::query_as("SELECT id, name, description, created_at FROM items ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|error| StoreError::Storage(error.to_string()))?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn get_item_by_id(&self, id: ItemId) -> Result<Item, StoreError> {
        let row: Option<ItemRow> =
            sqlx::query_as("SELECT id, name, description, created_at FROM items WHERE id = $1")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Item::from).ok_or(StoreError::NotFound)
    }

    async fn update_item(&self, id: ItemId, data: ItemData) -> Result<Item, StoreError> {
        let row: Option<ItemRow> = sqlx::query_as(
            "UPDATE items SET name = $1, description = $2 WHERE id = $3 \
             RETURNING id, name, description, created_at",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Item::from).ok_or(StoreError::NotFound)
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let created_at = Utc::now();
        let item = Item::from(ItemRow {
            id: 12,
            name: "a".to_string(),
            description: "b".to_string(),
            created_at,
        });
        assert_eq!(item.id, ItemId::new(12));
        assert_eq!(item.name, "a");
        assert_eq!(item.description, "b");
        assert_eq!(item.created_at, created_at);
    }

    #[tokio::test]
    async fn test_lazy_pool_reports_storage_error() {
        // Nothing listens on port 1; the lazy pool fails on first use.
        let options = PgConnectOptions::new().host("127.0.0.1").port(1);
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy_with(options);
        let store = PostgresItemStore::new(pool);

        let err = store.get_all_items().await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        let err = store.get_item_by_id(ItemId::new(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
