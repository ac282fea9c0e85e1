use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::Money;

/// A catalog product.
///
/// `id` is system-generated and immutable after creation. `code` is the
/// business-facing SKU and doubles as the routing key for product events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub price: Money,
    pub model: String,
    pub url: String,
}
