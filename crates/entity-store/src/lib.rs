//! Entity store abstraction for the storefront pipeline.
//!
//! This crate provides:
//! - `ItemKey` composite (partition, sort) keys
//! - `EntityStore` trait describing the key-value persistence contract
//! - `InMemoryEntityStore` implementation backing the server and tests

pub mod error;
pub mod key;
pub mod memory;
pub mod store;

pub use error::{EntityStoreError, Result};
pub use key::{Attributes, ItemKey};
pub use memory::InMemoryEntityStore;
pub use store::EntityStore;
