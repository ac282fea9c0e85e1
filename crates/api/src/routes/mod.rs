//! HTTP route handlers.

pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use axum::http::StatusCode;

/// Fallback for any unrecognized method/resource combination.
pub async fn bad_request() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "Bad request")
}
