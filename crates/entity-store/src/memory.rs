use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Attributes, EntityStore, EntityStoreError, ItemKey, Result};

type Table = BTreeMap<ItemKey, Attributes>;

/// In-memory entity store.
///
/// Tables are ordered maps keyed by `ItemKey`, so queries come back in
/// sort-key lexical order within a partition, matching the contract the
/// event log depends on. Cloning shares the underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryEntityStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryEntityStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items in a table. Missing tables count as empty.
    pub async fn item_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.len())
            .unwrap_or(0)
    }

    /// Clears all tables.
    pub async fn clear(&self) {
        self.tables.write().await.clear();
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn get(&self, table: &str, key: &ItemKey) -> Result<Attributes> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .and_then(|t| t.get(key))
            .cloned()
            .ok_or_else(|| EntityStoreError::NotFound {
                table: table.to_string(),
                key: key.clone(),
            })
    }

    async fn put(&self, table: &str, key: ItemKey, item: Attributes) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().insert(key, item);
        Ok(())
    }

    async fn batch_get(&self, table: &str, keys: &[ItemKey]) -> Result<Vec<Attributes>> {
        let tables = self.tables.read().await;
        let Some(t) = tables.get(table) else {
            return Ok(Vec::new());
        };
        // Missing keys are dropped, not errored; the caller reconciles.
        Ok(keys.iter().filter_map(|k| t.get(k)).cloned().collect())
    }

    async fn scan(&self, table: &str) -> Result<Vec<Attributes>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn query(&self, table: &str, partition: &str) -> Result<Vec<Attributes>> {
        let tables = self.tables.read().await;
        let Some(t) = tables.get(table) else {
            return Ok(Vec::new());
        };
        let lower = ItemKey::partition_only(partition);
        Ok(t.range(lower..)
            .take_while(|(k, _)| k.partition == partition)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn conditional_update(
        &self,
        table: &str,
        key: &ItemKey,
        fields: Attributes,
    ) -> Result<Attributes> {
        let mut tables = self.tables.write().await;
        let item = tables
            .get_mut(table)
            .and_then(|t| t.get_mut(key))
            .ok_or_else(|| EntityStoreError::ConditionFailed {
                table: table.to_string(),
                key: key.clone(),
            })?;
        for (name, value) in fields {
            item.insert(name, value);
        }
        Ok(item.clone())
    }

    async fn delete(&self, table: &str, key: &ItemKey) -> Result<Attributes> {
        let mut tables = self.tables.write().await;
        tables
            .get_mut(table)
            .and_then(|t| t.remove(key))
            .ok_or_else(|| EntityStoreError::NotFound {
                table: table.to_string(),
                key: key.clone(),
            })
    }
}
