//! Envelope wire format and typed domain event payloads.

use common::{OrderId, ProductId, RequestId};
use domain::{Billing, Money, Shipping};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The closed set of domain event kinds.
///
/// Doubles as the envelope's routing attribute: consumers subscribe by
/// event type without opening the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    OrderCreated,
    OrderDeleted,
}

impl EventType {
    /// Returns the wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ProductCreated => "PRODUCT_CREATED",
            EventType::ProductUpdated => "PRODUCT_UPDATED",
            EventType::ProductDeleted => "PRODUCT_DELETED",
            EventType::OrderCreated => "ORDER_CREATED",
            EventType::OrderDeleted => "ORDER_DELETED",
        }
    }

    /// Returns true for the product-domain event kinds.
    pub fn is_product(&self) -> bool {
        matches!(
            self,
            EventType::ProductCreated | EventType::ProductUpdated | EventType::ProductDeleted
        )
    }

}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level wrapper pairing an event-type tag with an opaque
/// serialized payload.
///
/// The payload stays a string until a consumer that understands the tag
/// opens it; the transport never inspects `data`. Envelopes are
/// fire-and-forget: no acknowledgment flows back to the originating
/// mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub event_type: EventType,
    pub data: String,
}

impl Envelope {
    /// Seals a payload into an envelope under the given tag.
    pub fn seal<T: Serialize>(event_type: EventType, payload: &T) -> Result<Self> {
        Ok(Self {
            event_type,
            data: serde_json::to_string(payload)?,
        })
    }

    /// Opens the envelope, dispatching on the tag.
    pub fn open(&self) -> Result<DomainEvent> {
        match self.event_type {
            EventType::ProductCreated | EventType::ProductUpdated | EventType::ProductDeleted => {
                Ok(DomainEvent::Product(serde_json::from_str(&self.data)?))
            }
            EventType::OrderCreated | EventType::OrderDeleted => {
                Ok(DomainEvent::Order(serde_json::from_str(&self.data)?))
            }
        }
    }
}

/// A deserialized domain event, one variant per payload shape.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
}

/// Payload for product-domain envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEvent {
    pub email: String,
    pub event_type: EventType,
    pub product_code: String,
    pub product_id: ProductId,
    pub product_price: Money,
    pub request_id: RequestId,
}

/// Payload for order-domain envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    pub email: String,
    pub order_id: OrderId,
    pub billing: Billing,
    pub shipping: Shipping,
    pub request_id: RequestId,
    pub product_codes: Vec<String>,
}
