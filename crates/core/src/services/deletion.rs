//! The delete-user admin operation, end to end.

use serde::Deserialize;
use tracing::info;
use validator::Validate;

use coterie_common::{AppError, AppResult};
use coterie_store::Caller;

use super::audit::AuditRecorder;
use super::authorization::AuthorizationService;
use super::cascade::CascadeExecutor;

/// Payload of the delete-user operation.
///
/// `userId` is the only recognized field; anything else fails
/// deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteUserInput {
    /// Id of the user to delete.
    #[validate(length(min = 1, message = "userId is required."))]
    pub user_id: String,
}

/// Confirmation returned to the caller on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReceipt {
    /// Human-readable confirmation message.
    pub message: String,
}

/// Orchestrates one delete-user operation: authorization, validation,
/// cascade, audit. Each invocation is a fresh pass; nothing is retried or
/// resumed, and concurrent invocations for the same target are not
/// serialized against each other.
#[derive(Clone)]
pub struct UserDeletionService {
    authorization: AuthorizationService,
    cascade: CascadeExecutor,
    audit: AuditRecorder,
}

impl UserDeletionService {
    /// Create a new deletion service.
    #[must_use]
    pub const fn new(
        authorization: AuthorizationService,
        cascade: CascadeExecutor,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            authorization,
            cascade,
            audit,
        }
    }

    /// Delete `input.user_id` and every record referencing them.
    ///
    /// Errors surface as the five caller-facing kinds: `Unauthenticated`,
    /// `PermissionDenied`, `InvalidArgument`, `NotFound` pass through, and
    /// everything else is collapsed into `Internal`. A failure after the
    /// cascade started leaves completed deletions committed, with no audit
    /// entry for the partial run.
    pub async fn delete_user(
        &self,
        caller: Option<&Caller>,
        input: &DeleteUserInput,
    ) -> AppResult<DeletionReceipt> {
        self.run(caller, input).await.map_err(translate)
    }

    async fn run(
        &self,
        caller: Option<&Caller>,
        input: &DeleteUserInput,
    ) -> AppResult<DeletionReceipt> {
        let admin = self.authorization.require_admin(caller).await?;
        input.validate()?;

        let outcome = self.cascade.delete_user_data(&input.user_id).await?;
        self.audit.record_user_deletion(&admin, &outcome).await?;

        info!(
            admin_uid = %admin.user_id,
            target_user_id = %outcome.target_user_id,
            removed = outcome.counts.total(),
            "user deletion completed"
        );
        Ok(DeletionReceipt {
            message: "User and all related data deleted successfully".to_string(),
        })
    }
}

/// Collapse infrastructure failures into the caller-facing `Internal` kind.
fn translate(error: AppError) -> AppError {
    match error {
        AppError::Unauthenticated(_)
        | AppError::PermissionDenied(_)
        | AppError::InvalidArgument(_)
        | AppError::NotFound(_)
        | AppError::Internal(_) => error,
        other => AppError::Internal(format!("Failed to delete user: {other}")),
    }
}
