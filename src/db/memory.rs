//! In-process item store
//!
//! Backs the `memory` backend and the test suite. Ids start at 1 and are
//! never reused, matching a `BIGSERIAL` column.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::{Mutex, RwLock};

use super::{ItemStore, StoreError};
use crate::models::{Item, ItemData, ItemId};

#[derive(Debug)]
pub struct InMemoryItemStore {
    items: RwLock<BTreeMap<ItemId, Item>>,
    // Held across the insert so ids are handed out in insertion order
    next_id: Mutex<i64>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            next_id: Mutex::new(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn add_item(&self, data: ItemData) -> Result<Item, StoreError> {
        let mut next_id = self.next_id.lock().await;
        let item = Item {
            id: ItemId::new(*next_id),
            name: data.name,
            description: data.description,
            created_at: Utc::now(),
        };
        self.items.write().await.insert(item.id, item.clone());
        *next_id += 1;
        Ok(item)
    }

    async fn get_all_items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn get_item_by_id(&self, id: ItemId) -> Result<Item, StoreError> {
        self.items
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_item(&self, id: ItemId, data: ItemData) -> Result<Item, StoreError> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound)?;
        item.apply(data);
        Ok(item.clone())
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        self.items
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_assigns_increasing_ids() {
        let store = InMemoryItemStore::new();
        let first = store.add_item(ItemData::new("a", "")).await.unwrap();
        let second = store.add_item(ItemData::new("b", "")).await.unwrap();
        assert_eq!(first.id, ItemId::new(1));
        assert_eq!(second.id, ItemId::new(2));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = InMemoryItemStore::new();
        let first = store.add_item(ItemData::default()).await.unwrap();
        store.delete_item(first.id).await.unwrap();
        let second = store.add_item(ItemData::default()).await.unwrap();
        assert_eq!(second.id, ItemId::new(2));
    }

    #[tokio::test]
    async fn test_get_all_in_insertion_order() {
        let store = InMemoryItemStore::new();
        assert!(store.get_all_items().await.unwrap().is_empty());
        for name in ["x", "y", "z"] {
            store.add_item(ItemData::new(name, "")).await.unwrap();
        }
        let names: Vec<_> = store
            .get_all_items()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, ["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = InMemoryItemStore::new();
        let id = ItemId::new(42);
        assert_eq!(store.get_item_by_id(id).await, Err(StoreError::NotFound));
        assert_eq!(
            store.update_item(id, ItemData::default()).await,
            Err(StoreError::NotFound)
        );
        assert_eq!(store.delete_item(id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let store = InMemoryItemStore::new();
        let created = store.add_item(ItemData::new("a", "first")).await.unwrap();
        let updated = store
            .update_item(created.id, ItemData::new("b", ""))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "b");
        assert_eq!(updated.description, "");
        assert_eq!(store.get_item_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_delete_is_terminal() {
        let store = InMemoryItemStore::new();
        let created = store.add_item(ItemData::new("a", "")).await.unwrap();
        assert_eq!(store.len().await, 1);
        store.delete_item(created.id).await.unwrap();
        assert!(store.is_empty().await);
        assert_eq!(store.delete_item(created.id).await, Err(StoreError::NotFound));
    }
}
