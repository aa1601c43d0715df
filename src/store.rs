//! Record store access for package measurements

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Measurement columns of a product row. Any of them may be unset in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemMeasurements {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// `Ok(None)` when no item has this id.
    async fn item_measurements(&self, id: &str) -> Result<Option<ItemMeasurements>, StoreError>;
}

/// Reads the `products` table.
#[derive(Clone)]
pub struct PgItemStore { pool: PgPool }

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn item_measurements(&self, id: &str) -> Result<Option<ItemMeasurements>, StoreError> {
        let row = sqlx::query_as::<_, ItemMeasurements>(
            "SELECT height::float8 AS height, width::float8 AS width, length::float8 AS length, weight::float8 AS weight FROM products WHERE id::text = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Map-backed store for local runs and tests.
#[derive(Default)]
pub struct InMemoryItemStore { items: RwLock<HashMap<String, ItemMeasurements>> }

impl InMemoryItemStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_item(self, id: impl Into<String>, measurements: ItemMeasurements) -> Self {
        self.insert(id, measurements);
        self
    }

    pub fn insert(&self, id: impl Into<String>, measurements: ItemMeasurements) {
        self.items.write().unwrap_or_else(PoisonError::into_inner).insert(id.into(), measurements);
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn item_measurements(&self, id: &str) -> Result<Option<ItemMeasurements>, StoreError> {
        let items = self.items.read().map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(items.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let store = InMemoryItemStore::new().with_item("p-1", ItemMeasurements { height: Some(4.0), ..Default::default() });
        assert_eq!(store.item_measurements("p-1").await.unwrap().unwrap().height, Some(4.0));
        assert!(store.item_measurements("p-2").await.unwrap().is_none());
    }

    #[test]
    fn test_insert_after_a_panicking_writer() {
        let store = std::sync::Arc::new(InMemoryItemStore::new());
        let writer = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.items.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(store.items.is_poisoned());

        store.insert("p-3", ItemMeasurements { width: Some(2.0), ..Default::default() });
        let items = store.items.read().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(items.get("p-3").and_then(|m| m.width), Some(2.0));
    }
}
