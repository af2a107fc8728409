//! Caller identity for the public submission throttle.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Fallback key when the request carries no forwarding header.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// First address in `X-Forwarded-For`, or [`UNKNOWN_CLIENT`].
///
/// The header is client-controlled; this only keys a courtesy throttle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let addr = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_CLIENT);
        Ok(ClientAddr(addr.to_string()))
    }
}
