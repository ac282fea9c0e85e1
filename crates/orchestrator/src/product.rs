//! Product mutation orchestrator and read-only catalog access.

use common::{MessageId, ProductId, RequestId};
use domain::{Product, ProductRepository};
use entity_store::EntityStore;
use events::{Envelope, EventBus, EventType, ProductEvent};

use crate::error::{OrchestratorError, Result};

/// Write path for the product catalog.
///
/// Every successful mutation emits a product event tagged with the caller's
/// email and the request correlation id. Conditional mutations publish only
/// after the store accepted the write.
pub struct ProductAdminService<S, B> {
    repository: ProductRepository<S>,
    bus: B,
}

impl<S: EntityStore, B: EventBus> ProductAdminService<S, B> {
    /// Creates the service over a repository and an event bus.
    pub fn new(repository: ProductRepository<S>, bus: B) -> Self {
        Self { repository, bus }
    }

    /// Creates a product and emits `PRODUCT_CREATED`.
    ///
    /// The repository assigns the id; the envelope is published after the
    /// write since it carries the generated id.
    #[tracing::instrument(skip(self, product), fields(code = %product.code))]
    pub async fn create(
        &self,
        product: Product,
        email: &str,
        request_id: RequestId,
    ) -> Result<Product> {
        ensure_non_negative(&product)?;
        let created = self.repository.create(product).await?;
        let message_id = self
            .send_product_event(&created, EventType::ProductCreated, email, request_id)
            .await?;
        tracing::info!(product_id = %created.id, %message_id, "product created event sent");
        metrics::counter!("products_created_total").increment(1);
        Ok(created)
    }

    /// Updates an existing product and emits `PRODUCT_UPDATED` on success.
    ///
    /// Fails with `NotFound` when the id does not exist; nothing is
    /// published in that case.
    #[tracing::instrument(skip(self, product))]
    pub async fn update(
        &self,
        id: ProductId,
        product: Product,
        email: &str,
        request_id: RequestId,
    ) -> Result<Product> {
        ensure_non_negative(&product)?;
        let updated = self.repository.update(id, product).await?;
        let message_id = self
            .send_product_event(&updated, EventType::ProductUpdated, email, request_id)
            .await?;
        tracing::info!(product_id = %updated.id, %message_id, "product updated event sent");
        Ok(updated)
    }

    /// Deletes a product and emits `PRODUCT_DELETED` on success.
    ///
    /// The event carries the pre-deletion snapshot's code and price.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ProductId, email: &str, request_id: RequestId) -> Result<Product> {
        let deleted = self.repository.delete(id).await?;
        let message_id = self
            .send_product_event(&deleted, EventType::ProductDeleted, email, request_id)
            .await?;
        tracing::info!(product_id = %deleted.id, %message_id, "product deleted event sent");
        Ok(deleted)
    }

    async fn send_product_event(
        &self,
        product: &Product,
        event_type: EventType,
        email: &str,
        request_id: RequestId,
    ) -> Result<MessageId> {
        let event = ProductEvent {
            email: email.to_string(),
            event_type,
            product_code: product.code.clone(),
            product_id: product.id,
            product_price: product.price,
            request_id,
        };
        let envelope = Envelope::seal(event_type, &event)?;
        Ok(self.bus.publish(envelope).await?)
    }
}

fn ensure_non_negative(product: &Product) -> Result<()> {
    if product.price.is_negative() {
        return Err(OrchestratorError::InvalidPrice {
            price: product.price.cents(),
        });
    }
    Ok(())
}

/// Read-only catalog access for the fetch path.
///
/// Holds no bus handle and exposes no mutation, keeping the read surface
/// separated from the write surface.
pub struct ProductReader<S> {
    repository: ProductRepository<S>,
}

impl<S: EntityStore> ProductReader<S> {
    /// Creates the reader over a repository.
    pub fn new(repository: ProductRepository<S>) -> Self {
        Self { repository }
    }

    /// Returns the full catalog.
    #[tracing::instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Product>> {
        Ok(self.repository.get_all().await?)
    }

    /// Returns one product by id, or `NotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: ProductId) -> Result<Product> {
        Ok(self.repository.get_by_id(id).await?)
    }
}
