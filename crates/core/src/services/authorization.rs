//! Admin authorization guard for privileged operations.

use std::sync::Arc;

use coterie_common::{AppError, AppResult};
use coterie_store::{Caller, DocumentStore, collections, records::UserRecord};

/// The verified administrator a privileged operation runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminActor {
    /// The admin's user id.
    pub user_id: String,
    /// The admin's email, as recorded on their user document.
    pub email: Option<String>,
}

/// Gates privileged operations on the caller's `isAdmin` flag.
#[derive(Clone)]
pub struct AuthorizationService {
    store: Arc<dyn DocumentStore>,
}

impl AuthorizationService {
    /// Create a new authorization service.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Verify that the caller is an authenticated administrator.
    ///
    /// Costs exactly one point read of the caller's own user document and
    /// mutates nothing. An authenticated caller without a user document is
    /// denied, not treated as missing data.
    pub async fn require_admin(&self, caller: Option<&Caller>) -> AppResult<AdminActor> {
        let Some(caller) = caller else {
            return Err(AppError::Unauthenticated(
                "User must be authenticated.".to_string(),
            ));
        };

        let doc = self
            .store
            .get(collections::USERS, &caller.user_id)
            .await?
            .ok_or_else(|| {
                AppError::PermissionDenied("Admin user not found in database.".to_string())
            })?;

        let record: UserRecord = doc.decode()?;
        if !record.is_admin {
            return Err(AppError::PermissionDenied(
                "Only admins can delete users.".to_string(),
            ));
        }

        Ok(AdminActor {
            user_id: caller.user_id.clone(),
            email: record.email,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use coterie_store::test_utils::CountingStore;
    use coterie_store::{MemoryStore, to_fields};
    use serde_json::json;

    fn caller(user_id: &str) -> Caller {
        Caller {
            user_id: user_id.to_string(),
        }
    }

    async fn seed_user(store: &MemoryStore, id: &str, is_admin: bool) {
        let fields = match json!({"email": format!("{id}@example.com"), "isAdmin": is_admin}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        store.insert(collections::USERS, id, fields).await;
    }

    #[tokio::test]
    async fn missing_caller_is_unauthenticated_without_store_traffic() {
        let mem = Arc::new(MemoryStore::new());
        let counting = Arc::new(CountingStore::new(mem));
        let service = AuthorizationService::new(counting.clone());

        let err = service.require_admin(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
        assert_eq!(counting.reads(), 0);
        assert_eq!(counting.writes(), 0);
    }

    #[tokio::test]
    async fn caller_without_user_document_is_denied() {
        let store = Arc::new(MemoryStore::new());
        let service = AuthorizationService::new(store);

        let err = service
            .require_admin(Some(&caller("ghost")))
            .await
            .unwrap_err();
        match err {
            AppError::PermissionDenied(message) => {
                assert_eq!(message, "Admin user not found in database.");
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_admin_caller_is_denied() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "u1", false).await;
        let service = AuthorizationService::new(store);

        let err = service
            .require_admin(Some(&caller("u1")))
            .await
            .unwrap_err();
        match err {
            AppError::PermissionDenied(message) => {
                assert_eq!(message, "Only admins can delete users.");
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn admin_caller_passes_with_email() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "admin-1", true).await;
        let service = AuthorizationService::new(store);

        let actor = service
            .require_admin(Some(&caller("admin-1")))
            .await
            .unwrap();
        assert_eq!(actor.user_id, "admin-1");
        assert_eq!(actor.email.as_deref(), Some("admin-1@example.com"));
    }

    #[tokio::test]
    async fn admin_flag_missing_counts_as_non_admin() {
        let store = Arc::new(MemoryStore::new());
        let fields = to_fields(&UserRecord {
            email: None,
            is_admin: false,
        })
        .unwrap();
        store.insert(collections::USERS, "u2", fields).await;
        let service = AuthorizationService::new(store);

        let err = service
            .require_admin(Some(&caller("u2")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }
}
