//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use coterie_core::{AuditRecorder, AuthorizationService, UserDeletionService};
use coterie_store::IdentityProvider;
use tracing::{debug, warn};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub deletion_service: UserDeletionService,
    pub authorization_service: AuthorizationService,
    pub audit_recorder: AuditRecorder,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Authentication middleware.
///
/// Resolves a bearer token to a [`coterie_store::Caller`] and attaches it to
/// the request. Requests without a resolvable token proceed unauthenticated;
/// the admin gate downstream rejects them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.identity.verify_token(token).await {
            Ok(Some(caller)) => {
                req.extensions_mut().insert(caller);
            }
            Ok(None) => debug!("bearer token did not resolve to a caller"),
            Err(e) => warn!(error = %e, "token verification failed; continuing unauthenticated"),
        }
    }

    next.run(req).await
}
