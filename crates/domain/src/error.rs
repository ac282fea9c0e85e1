//! Domain error types.

use entity_store::EntityStoreError;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A keyed lookup, update, or delete referenced an absent entity.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// An error occurred in the entity store.
    #[error("Entity store error: {0}")]
    Store(EntityStoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Translates a store failure for `entity` keyed by `key`.
    ///
    /// Both an absent item and a failed existence condition surface as
    /// `NotFound`.
    pub(crate) fn from_store(entity: &'static str, key: String, err: EntityStoreError) -> Self {
        match err {
            EntityStoreError::NotFound { .. } | EntityStoreError::ConditionFailed { .. } => {
                DomainError::NotFound { entity, key }
            }
            other => DomainError::Store(other),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
