use entity_store::EntityStoreError;
use thiserror::Error;

/// Errors that can occur on the event delivery path.
#[derive(Debug, Error)]
pub enum EventError {
    /// The transport could not accept the envelope.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// A payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The entity store rejected a log entry write.
    #[error("Entity store error: {0}")]
    Store(#[from] EntityStoreError),
}

/// Result type for event operations.
pub type Result<T> = std::result::Result<T, EventError>;
