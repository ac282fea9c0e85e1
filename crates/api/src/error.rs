//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use orchestrator::OrchestratorError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Orchestrator error.
    Orchestrator(OrchestratorError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, msg),
            ApiError::Orchestrator(err) => orchestrator_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}

fn orchestrator_error_to_response(err: OrchestratorError) -> Response {
    match &err {
        // Reference body, preserved verbatim as plain text.
        OrchestratorError::ProductNotFound => {
            (StatusCode::NOT_FOUND, "Some product was not found").into_response()
        }
        OrchestratorError::InvalidPrice { .. } => {
            json_error(StatusCode::BAD_REQUEST, err.to_string())
        }
        OrchestratorError::Domain(DomainError::NotFound { .. }) => {
            json_error(StatusCode::NOT_FOUND, err.to_string())
        }
        // Transport failures during the commit step are not converted: the
        // whole request fails and any completed half of the persist+publish
        // pair stays behind.
        OrchestratorError::Domain(_) | OrchestratorError::Event(_) => {
            tracing::error!(error = %err, "mutation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn json_error(status: StatusCode, message: String) -> Response {
    let body = serde_json::json!({ "error": message });
    (status, axum::Json(body)).into_response()
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        ApiError::Orchestrator(err)
    }
}
