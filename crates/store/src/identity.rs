//! Identity provider seam.
//!
//! Login credentials live in a separate identity store keyed by the same
//! user id as the `users` collection. The two stores can drift; the
//! deletion cascade tolerates an already missing identity record.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use coterie_common::{AppError, AppResult, IdGenerator};

/// Authenticated caller identity, resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// User id of the caller, as known to the identity store.
    pub user_id: String,
}

/// Identity store failure surfaced by [`IdentityProvider::delete_identity`].
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// No identity record exists for the user id.
    #[error("identity record not found")]
    NotFound,

    /// Any other provider failure.
    #[error("identity provider failure: {0}")]
    Provider(String),
}

/// External identity store operations the admin service needs.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token to a caller.
    ///
    /// Returns `Ok(None)` for unknown or expired tokens; `Err` only when
    /// the provider itself could not be reached.
    async fn verify_token(&self, token: &str) -> AppResult<Option<Caller>>;

    /// Delete the identity record for a user id.
    async fn delete_identity(&self, user_id: &str) -> Result<(), IdentityError>;
}

/// In-memory [`IdentityProvider`] implementation.
///
/// Tokens are opaque strings mapped straight to user ids; nothing expires.
/// Backs local development and tests.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    identities: RwLock<HashSet<String>>,
    tokens: RwLock<HashMap<String, String>>,
    id_gen: IdGenerator,
}

impl MemoryIdentityProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity record for a user id.
    pub async fn register(&self, user_id: &str) {
        let mut identities = self.identities.write().await;
        identities.insert(user_id.to_string());
    }

    /// Issue a bearer token that resolves to `user_id`.
    pub async fn issue_token(&self, user_id: &str) -> String {
        let token = self.id_gen.generate_token();
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.clone(), user_id.to_string());
        token
    }

    /// Whether an identity record exists for `user_id`.
    pub async fn contains(&self, user_id: &str) -> bool {
        let identities = self.identities.read().await;
        identities.contains(user_id)
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<Option<Caller>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token).map(|user_id| Caller {
            user_id: user_id.clone(),
        }))
    }

    async fn delete_identity(&self, user_id: &str) -> Result<(), IdentityError> {
        let mut identities = self.identities.write().await;
        if identities.remove(user_id) {
            Ok(())
        } else {
            Err(IdentityError::NotFound)
        }
    }
}

/// Remote identity service reached over HTTP.
///
/// Token verification posts to `/v1/tokens/verify`; identity deletion is a
/// `DELETE /v1/identities/{user_id}`. Service-to-service calls carry the
/// configured bearer token.
pub struct HttpIdentityProvider {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyTokenResponse {
    user_id: String,
}

impl HttpIdentityProvider {
    /// Create a provider for the identity service at `base_url`.
    #[must_use]
    pub fn new(base_url: String, api_token: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<Option<Caller>> {
        let url = format!("{}/v1/tokens/verify", self.base_url);
        let response = self
            .authorize(self.http_client.post(&url))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::NOT_FOUND {
            debug!("token did not resolve to an identity");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::Identity(format!(
                "token verification returned {status}"
            )));
        }

        let body: VerifyTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;
        Ok(Some(Caller {
            user_id: body.user_id,
        }))
    }

    async fn delete_identity(&self, user_id: &str) -> Result<(), IdentityError> {
        let url = format!("{}/v1/identities/{user_id}", self.base_url);
        let response = self
            .authorize(self.http_client.delete(&url))
            .send()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(IdentityError::NotFound);
        }
        if !status.is_success() {
            return Err(IdentityError::Provider(format!(
                "identity deletion returned {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tokens_resolve_to_their_user() {
        let provider = MemoryIdentityProvider::new();
        provider.register("u1").await;
        let token = provider.issue_token("u1").await;

        let caller = provider.verify_token(&token).await.unwrap();
        assert_eq!(caller.map(|c| c.user_id).as_deref(), Some("u1"));

        let unknown = provider.verify_token("bogus").await.unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn deleting_unknown_identity_reports_not_found() {
        let provider = MemoryIdentityProvider::new();
        provider.register("u1").await;

        provider.delete_identity("u1").await.unwrap();
        assert!(!provider.contains("u1").await);

        let err = provider.delete_identity("u1").await.unwrap_err();
        assert!(matches!(err, IdentityError::NotFound));
    }
}
