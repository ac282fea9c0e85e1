use thiserror::Error;

use crate::ItemKey;

/// Errors that can occur when interacting with the entity store.
#[derive(Debug, Error)]
pub enum EntityStoreError {
    /// No item exists under the given key.
    #[error("Item not found in table '{table}': {key}")]
    NotFound { table: String, key: ItemKey },

    /// A conditional write failed because the item does not already exist.
    #[error("Condition failed in table '{table}': {key} does not exist")]
    ConditionFailed { table: String, key: ItemKey },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for entity store operations.
pub type Result<T> = std::result::Result<T, EntityStoreError>;
