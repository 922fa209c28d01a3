//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use coterie_store::Caller;

/// Optional authenticated caller extractor.
///
/// Resolves to `None` when the auth middleware attached no caller, leaving
/// the handler to decide how anonymous requests are treated.
#[derive(Debug, Clone)]
pub struct MaybeAuthCaller(pub Option<Caller>);

impl<S> FromRequestParts<S> for MaybeAuthCaller
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Caller is set by the auth middleware when the bearer token resolves
        Ok(Self(parts.extensions.get::<Caller>().cloned()))
    }
}
