//! Shared identifier types used across the storefront pipeline.

pub mod types;

pub use types::{MessageId, OrderId, ProductId, RequestId};
