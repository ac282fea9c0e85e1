//! Caller identity resolved by the external authentication collaborator.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the caller email resolved upstream.
///
/// Credential validation happens outside this service; by the time a
/// request arrives the gateway has already translated the caller's claims
/// into this header.
pub const CALLER_EMAIL_HEADER: &str = "x-caller-email";

/// The already-resolved caller email for the current request.
///
/// Requests arriving without the header are attributed to `"anonymous"`.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub String);

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(CALLER_EMAIL_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("anonymous")
            .to_string();
        Ok(CallerIdentity(email))
    }
}
