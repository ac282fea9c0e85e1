use async_trait::async_trait;

use crate::{Attributes, ItemKey, Result};

/// Core trait for entity store implementations.
///
/// The store holds schemaless items in named tables under composite
/// (partition, sort) keys. No multi-item transactions are assumed; every
/// write is last-write-wins unless explicitly conditional.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Retrieves the item stored under `key`.
    ///
    /// Fails with `NotFound` if no item exists.
    async fn get(&self, table: &str, key: &ItemKey) -> Result<Attributes>;

    /// Stores `item` under `key`, overwriting any existing item.
    async fn put(&self, table: &str, key: ItemKey, item: Attributes) -> Result<()>;

    /// Retrieves the items stored under `keys`.
    ///
    /// Missing keys are silently omitted from the result; callers must
    /// reconcile partial results by comparing counts.
    async fn batch_get(&self, table: &str, keys: &[ItemKey]) -> Result<Vec<Attributes>>;

    /// Retrieves every item in the table.
    ///
    /// No pagination guarantee; acceptable for small tables only.
    async fn scan(&self, table: &str) -> Result<Vec<Attributes>>;

    /// Retrieves every item under `partition`, in sort-key lexical order.
    async fn query(&self, table: &str, partition: &str) -> Result<Vec<Attributes>>;

    /// Merges `fields` into the item stored under `key`, which must already
    /// exist.
    ///
    /// Returns the full merged item on success; fails with `ConditionFailed`
    /// if no item exists under `key`. Key attributes are never modified.
    async fn conditional_update(
        &self,
        table: &str,
        key: &ItemKey,
        fields: Attributes,
    ) -> Result<Attributes>;

    /// Removes the item stored under `key` and returns it.
    ///
    /// Fails with `NotFound` if no item exists; nothing is written in that
    /// case.
    async fn delete(&self, table: &str, key: &ItemKey) -> Result<Attributes>;
}
