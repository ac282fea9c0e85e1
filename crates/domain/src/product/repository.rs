use common::ProductId;
use entity_store::{EntityStore, ItemKey};

use crate::error::{DomainError, Result};
use crate::item::{from_item, to_item};

use super::Product;

/// Typed CRUD operations for products over the entity store.
///
/// Products live in a single-attribute-key table partitioned by `id`.
pub struct ProductRepository<S> {
    store: S,
    table: String,
}

impl<S: EntityStore> ProductRepository<S> {
    /// Creates a repository over `store` using the given table name.
    pub fn new(store: S, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    fn key(id: ProductId) -> ItemKey {
        ItemKey::partition_only(id.to_string())
    }

    /// Returns every product in the catalog.
    ///
    /// Full scan, no pagination; acceptable for small catalogs.
    pub async fn get_all(&self) -> Result<Vec<Product>> {
        let items = self
            .store
            .scan(&self.table)
            .await
            .map_err(DomainError::Store)?;
        items.into_iter().map(from_item).collect()
    }

    /// Returns the product with the given id, or `NotFound`.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Product> {
        let item = self
            .store
            .get(&self.table, &Self::key(id))
            .await
            .map_err(|e| DomainError::from_store("Product", id.to_string(), e))?;
        from_item(item)
    }

    /// Batch-fetches products by id, returning only the subset found.
    ///
    /// Missing ids are silently omitted; callers detect partial results by
    /// comparing the returned count against the requested count.
    pub async fn get_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let keys: Vec<ItemKey> = ids.iter().map(|id| Self::key(*id)).collect();
        let items = self
            .store
            .batch_get(&self.table, &keys)
            .await
            .map_err(DomainError::Store)?;
        items.into_iter().map(from_item).collect()
    }

    /// Persists a new product under a freshly generated id.
    ///
    /// Any caller-supplied id is overwritten.
    pub async fn create(&self, mut product: Product) -> Result<Product> {
        product.id = ProductId::new();
        let item = to_item(&product)?;
        self.store
            .put(&self.table, Self::key(product.id), item)
            .await
            .map_err(DomainError::Store)?;
        Ok(product)
    }

    /// Updates an existing product's attributes, keeping its id.
    ///
    /// Fails with `NotFound` when `id` does not exist; no write occurs in
    /// that case. Returns the full updated record.
    pub async fn update(&self, id: ProductId, product: Product) -> Result<Product> {
        let mut fields = to_item(&product)?;
        fields.remove("id");
        let updated = self
            .store
            .conditional_update(&self.table, &Self::key(id), fields)
            .await
            .map_err(|e| DomainError::from_store("Product", id.to_string(), e))?;
        from_item(updated)
    }

    /// Deletes a product and returns the pre-deletion snapshot.
    ///
    /// Fails with `NotFound` when `id` does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<Product> {
        let previous = self
            .store
            .delete(&self.table, &Self::key(id))
            .await
            .map_err(|e| DomainError::from_store("Product", id.to_string(), e))?;
        from_item(previous)
    }
}
