//! Extract the caller identity from the request (X-User-Id header).
//! Real session middleware sits in front of this service; by the time a
//! request lands here the identity is a plain trusted header.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Header name for the caller identity. Default: `X-User-Id`.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extractor for optional caller identity from `X-User-Id` header.
#[derive(Clone, Debug)]
pub struct CallerIdentity(pub Option<String>);

impl CallerIdentity {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v: &axum::http::HeaderValue| v.to_str().ok())
            .map(|s: &str| s.trim().to_string())
            .filter(|s: &String| !s.is_empty());
        Ok(CallerIdentity(value))
    }
}
