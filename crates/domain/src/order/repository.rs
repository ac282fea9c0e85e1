use common::OrderId;
use entity_store::{EntityStore, ItemKey};

use crate::error::{DomainError, Result};
use crate::item::{from_item, to_item};

use super::Order;

/// Typed CRUD operations for orders over the entity store.
///
/// Orders live in a composite-key table: partition = customer email,
/// sort = order id.
pub struct OrderRepository<S> {
    store: S,
    table: String,
}

impl<S: EntityStore> OrderRepository<S> {
    /// Creates a repository over `store` using the given table name.
    pub fn new(store: S, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    fn key(email: &str, order_id: OrderId) -> ItemKey {
        ItemKey::new(email, order_id.to_string())
    }

    /// Point lookup of one order, or `NotFound`.
    pub async fn get_order(&self, email: &str, order_id: OrderId) -> Result<Order> {
        let item = self
            .store
            .get(&self.table, &Self::key(email, order_id))
            .await
            .map_err(|e| DomainError::from_store("Order", order_id.to_string(), e))?;
        from_item(item)
    }

    /// Returns every order under one customer's partition.
    pub async fn get_orders_by_email(&self, email: &str) -> Result<Vec<Order>> {
        let items = self
            .store
            .query(&self.table, email)
            .await
            .map_err(DomainError::Store)?;
        items.into_iter().map(from_item).collect()
    }

    /// Returns every order across all customers. Full scan.
    pub async fn get_all_orders(&self) -> Result<Vec<Order>> {
        let items = self
            .store
            .scan(&self.table)
            .await
            .map_err(DomainError::Store)?;
        items.into_iter().map(from_item).collect()
    }

    /// Persists an order unconditionally.
    ///
    /// Order ids are generated, so collisions are assumed negligible.
    pub async fn create_order(&self, order: &Order) -> Result<()> {
        let item = to_item(order)?;
        self.store
            .put(&self.table, Self::key(&order.email, order.id), item)
            .await
            .map_err(DomainError::Store)
    }

    /// Deletes an order and returns the pre-deletion snapshot.
    ///
    /// Fails with `NotFound` when the order does not exist; no write occurs
    /// in that case.
    pub async fn delete_order(&self, email: &str, order_id: OrderId) -> Result<Order> {
        let previous = self
            .store
            .delete(&self.table, &Self::key(email, order_id))
            .await
            .map_err(|e| DomainError::from_store("Order", order_id.to_string(), e))?;
        from_item(previous)
    }
}
