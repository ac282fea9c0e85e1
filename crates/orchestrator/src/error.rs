//! Orchestrator error types.

use domain::DomainError;
use events::EventError;
use thiserror::Error;

/// Errors that can occur while orchestrating a mutation.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// An order referenced at least one product that does not exist.
    #[error("Some product was not found")]
    ProductNotFound,

    /// A product carried a negative price.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: i64 },

    /// Repository operation failed.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Event emission failed.
    ///
    /// During the concurrent persist+publish commit this is not caught and
    /// converted; it surfaces as a failure of the whole request, leaving
    /// any already-completed half of the pair in place.
    #[error("Event error: {0}")]
    Event(#[from] EventError),
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
