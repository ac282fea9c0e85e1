//! Order mutation orchestrator.

use chrono::Utc;
use common::{OrderId, ProductId, RequestId};
use domain::{
    Billing, Order, OrderItem, OrderRepository, PaymentMethod, Product, ProductRepository,
    Shipping,
};
use entity_store::EntityStore;
use events::{AuditBus, AuditRecord, Envelope, EventBus, EventType, OrderEvent};
use serde::{Deserialize, Serialize};

use crate::error::{OrchestratorError, Result};

/// An inbound order creation request.
///
/// Carried verbatim into the audit record when validation rejects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub email: String,
    pub product_ids: Vec<ProductId>,
    pub payment: PaymentMethod,
    pub shipping: Shipping,
}

/// Orchestrates the order lifecycle: validate, build, commit, delete.
///
/// The commit step runs persist and publish concurrently and waits for
/// both; there is no atomicity between them. A publish failure after a
/// successful persist (or the reverse) leaves a permanent half-completed
/// artifact, by contract.
pub struct OrderService<S, B, A> {
    orders: OrderRepository<S>,
    products: ProductRepository<S>,
    bus: B,
    audit: A,
}

impl<S: EntityStore, B: EventBus, A: AuditBus> OrderService<S, B, A> {
    /// Creates the service over the two repositories, the event bus, and
    /// the audit bus.
    pub fn new(
        orders: OrderRepository<S>,
        products: ProductRepository<S>,
        bus: B,
        audit: A,
    ) -> Self {
        Self {
            orders,
            products,
            bus,
            audit,
        }
    }

    /// Creates an order from the requested product codes.
    ///
    /// If any referenced product is missing, nothing is persisted and no
    /// domain event is published; a single diagnostic record goes to the
    /// audit path instead and the caller gets `ProductNotFound`.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_order(&self, request: OrderRequest, request_id: RequestId) -> Result<Order> {
        let start = std::time::Instant::now();

        let products = self.products.get_by_ids(&request.product_ids).await?;
        if products.len() < request.product_ids.len() {
            tracing::error!(
                requested = request.product_ids.len(),
                found = products.len(),
                "some product was not found"
            );
            self.emit_rejection(&request).await?;
            metrics::counter!("orders_rejected_total").increment(1);
            return Err(OrchestratorError::ProductNotFound);
        }

        let order = build_order(&request, &products);
        let envelope = order_envelope(&order, EventType::OrderCreated, request_id)?;

        // Persist and publish concurrently; wait for both, report both.
        let (persisted, published) =
            tokio::join!(self.orders.create_order(&order), self.bus.publish(envelope));
        persisted?;
        let message_id = published?;

        tracing::info!(order_id = %order.id, %message_id, "order created event sent");
        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("order_create_duration_seconds").record(start.elapsed().as_secs_f64());
        Ok(order)
    }

    /// Deletes an order and publishes `ORDER_DELETED`.
    ///
    /// The delete runs first so a missing order short-circuits with
    /// `NotFound` before anything is published; the publish that follows is
    /// still non-transactional with respect to the delete.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(
        &self,
        email: &str,
        order_id: OrderId,
        request_id: RequestId,
    ) -> Result<Order> {
        let deleted = self.orders.delete_order(email, order_id).await?;
        let envelope = order_envelope(&deleted, EventType::OrderDeleted, request_id)?;
        let message_id = self.bus.publish(envelope).await?;
        tracing::info!(order_id = %deleted.id, %message_id, "order deleted event sent");
        Ok(deleted)
    }

    /// Point lookup of one order.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, email: &str, order_id: OrderId) -> Result<Order> {
        Ok(self.orders.get_order(email, order_id).await?)
    }

    /// Returns every order for one customer.
    #[tracing::instrument(skip(self))]
    pub async fn get_orders_by_email(&self, email: &str) -> Result<Vec<Order>> {
        Ok(self.orders.get_orders_by_email(email).await?)
    }

    /// Returns every order across all customers.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_orders(&self) -> Result<Vec<Order>> {
        Ok(self.orders.get_all_orders().await?)
    }

    async fn emit_rejection(&self, request: &OrderRequest) -> Result<()> {
        let detail = serde_json::json!({
            "reason": "PRODUCT_NOT_FOUND",
            "orderRequest": serde_json::to_value(request).map_err(events::EventError::from)?,
        });
        Ok(self
            .audit
            .emit(AuditRecord::new("app.order", "order", detail))
            .await?)
    }
}

fn build_order(request: &OrderRequest, products: &[Product]) -> Order {
    let items: Vec<OrderItem> = products
        .iter()
        .map(|p| OrderItem {
            code: p.code.clone(),
            price: p.price,
        })
        .collect();
    let total_price = items.iter().map(|i| i.price).sum();

    Order {
        email: request.email.clone(),
        id: OrderId::new(),
        created_at: Utc::now(),
        billing: Billing {
            payment_method: request.payment,
            total_price,
        },
        shipping: request.shipping,
        products: items,
    }
}

fn order_envelope(order: &Order, event_type: EventType, request_id: RequestId) -> Result<Envelope> {
    let event = OrderEvent {
        email: order.email.clone(),
        order_id: order.id,
        billing: order.billing,
        shipping: order.shipping,
        request_id,
        product_codes: order.products.iter().map(|p| p.code.clone()).collect(),
    };
    Ok(Envelope::seal(event_type, &event)?)
}
