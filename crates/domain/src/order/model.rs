use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::Money;

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    DebitCard,
    CreditCard,
}

/// Shipping service level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingType {
    Economic,
    Urgent,
}

/// Shipping carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Carrier {
    Post,
    Fedex,
}

/// Billing details for an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    pub payment_method: PaymentMethod,
    pub total_price: Money,
}

/// Shipping details for an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shipping {
    #[serde(rename = "type")]
    pub shipping_type: ShippingType,
    pub carrier: Carrier,
}

/// A product snapshot captured at order time.
///
/// Copies of the referenced product's `code` and `price`, not live
/// references: later product mutations never change an existing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub code: String,
    pub price: Money,
}

/// A customer order.
///
/// Identity is the composite key `(email, id)`. Orders are immutable except
/// for deletion; `billing.total_price` equals the sum of the snapshot
/// prices at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub email: String,
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub billing: Billing,
    pub shipping: Shipping,
    pub products: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            email: "a@b.com".to_string(),
            id: OrderId::new(),
            created_at: Utc::now(),
            billing: Billing {
                payment_method: PaymentMethod::Cash,
                total_price: Money::from_cents(2500),
            },
            shipping: Shipping {
                shipping_type: ShippingType::Economic,
                carrier: Carrier::Post,
            },
            products: vec![
                OrderItem {
                    code: "PROD1".to_string(),
                    price: Money::from_cents(1500),
                },
                OrderItem {
                    code: "PROD2".to_string(),
                    price: Money::from_cents(1000),
                },
            ],
        }
    }

    #[test]
    fn order_json_roundtrip() {
        let order = order();
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }

    #[test]
    fn enums_use_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_value(order()).unwrap();
        assert_eq!(json["billing"]["paymentMethod"], "CASH");
        assert_eq!(json["shipping"]["type"], "ECONOMIC");
        assert_eq!(json["shipping"]["carrier"], "POST");
    }
}
