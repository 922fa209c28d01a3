//! Cascading removal of a user and every record referencing them.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{Value, json};
use tracing::{debug, warn};

use coterie_common::{AppError, AppResult};
use coterie_store::{
    DocumentStore, IdentityError, IdentityProvider,
    collections::{self, DependentCollection},
    records::{DeletionCounts, GroupRecord, UserRecord},
};

/// What one completed cascade removed, for the audit trail.
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    /// The deleted user's id.
    pub target_user_id: String,
    /// The deleted user's email, captured before their document went away.
    pub target_email: Option<String>,
    /// Per-collection removal counts.
    pub counts: DeletionCounts,
    /// Set when the identity record could not be removed. The document
    /// cascade is already committed at that point, so this is a warning,
    /// not a failure.
    pub identity_warning: Option<String>,
}

/// Executes the deletion cascade for one target user.
///
/// Order is load-bearing: the user document is read first so a missing
/// target aborts before any mutation, the dependent-collection sweeps all
/// complete before group pruning starts, and the identity record goes last.
/// Nothing is rolled back; a failure leaves already-deleted records deleted.
#[derive(Clone)]
pub struct CascadeExecutor {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl CascadeExecutor {
    /// Create a new cascade executor.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Remove every trace of `user_id` from the store.
    pub async fn delete_user_data(&self, user_id: &str) -> AppResult<CascadeOutcome> {
        let user_doc = self
            .store
            .get(collections::USERS, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
        let target: UserRecord = user_doc.decode()?;

        let counts = self.sweep_dependents(user_id).await?;
        let counts = self.prune_group_memberships(user_id, counts).await?;

        self.store.delete(collections::USERS, user_id).await?;

        // The identity store is separate and can drift from the documents,
        // so a missing or undeletable identity does not fail the cascade.
        let identity_warning = match self.identity.delete_identity(user_id).await {
            Ok(()) => None,
            Err(IdentityError::NotFound) => {
                debug!(user_id, "identity record already absent");
                None
            }
            Err(IdentityError::Provider(message)) => {
                warn!(
                    user_id,
                    error = %message,
                    "identity deletion failed after document cascade committed"
                );
                Some(message)
            }
        };

        Ok(CascadeOutcome {
            target_user_id: user_id.to_string(),
            target_email: target.email,
            counts,
            identity_warning,
        })
    }

    /// Run all dependent-collection sweeps concurrently and join them.
    ///
    /// Every sweep runs to completion before this returns. On failure the
    /// first error propagates and the successful sweeps' deletions stay
    /// committed.
    async fn sweep_dependents(&self, user_id: &str) -> AppResult<DeletionCounts> {
        let sweeps = DependentCollection::ALL.map(|collection| self.sweep(collection, user_id));
        let results = join_all(sweeps).await;

        let mut counts = DeletionCounts::default();
        let mut failed: Option<(DependentCollection, AppError)> = None;
        for (collection, result) in DependentCollection::ALL.into_iter().zip(results) {
            match result {
                Ok(count) => counts.set(collection, count),
                Err(error) => {
                    if failed.is_none() {
                        failed = Some((collection, error));
                    } else {
                        warn!(collection = collection.name(), error = %error, "sweep failed");
                    }
                }
            }
        }

        if let Some((collection, error)) = failed {
            warn!(
                user_id,
                collection = collection.name(),
                removed = counts.total(),
                "cascade aborted at sweep barrier; completed deletions stay committed"
            );
            return Err(error);
        }
        Ok(counts)
    }

    /// One query-then-delete pass over a dependent collection.
    async fn sweep(&self, collection: DependentCollection, user_id: &str) -> AppResult<u64> {
        let target = Value::String(user_id.to_string());
        let matches = self
            .store
            .find_by_field(collection.name(), collections::USER_ID_FIELD, &target)
            .await?;

        let deletions = matches
            .iter()
            .map(|doc| self.store.delete(collection.name(), &doc.id));
        join_all(deletions)
            .await
            .into_iter()
            .collect::<AppResult<Vec<()>>>()?;

        let count = matches.len() as u64;
        debug!(collection = collection.name(), user_id, count, "sweep finished");
        Ok(count)
    }

    /// Rewrite the member list of every group that references the user.
    ///
    /// Membership is not indexed by member, so this scans the whole
    /// `groups` collection; an inverted member index would turn it into a
    /// point query. Only groups actually containing the user are written.
    async fn prune_group_memberships(
        &self,
        user_id: &str,
        mut counts: DeletionCounts,
    ) -> AppResult<DeletionCounts> {
        let groups = self.store.list(collections::GROUPS).await?;

        let mut updates = Vec::new();
        for doc in &groups {
            let record: GroupRecord = doc.decode()?;
            if record.members.iter().any(|member| member == user_id) {
                let remaining: Vec<&String> = record
                    .members
                    .iter()
                    .filter(|member| member.as_str() != user_id)
                    .collect();
                updates.push(self.store.update_field(
                    collections::GROUPS,
                    &doc.id,
                    collections::MEMBERS_FIELD,
                    json!(remaining),
                ));
            }
        }

        counts.groups_removed_from = updates.len() as u64;
        join_all(updates)
            .await
            .into_iter()
            .collect::<AppResult<Vec<()>>>()?;
        Ok(counts)
    }
}
