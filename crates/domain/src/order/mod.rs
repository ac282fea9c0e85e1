//! Order model and repository.

mod model;
mod repository;

pub use model::{Billing, Carrier, Order, OrderItem, PaymentMethod, Shipping, ShippingType};
pub use repository::OrderRepository;
