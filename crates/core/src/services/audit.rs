//! Audit trail of privileged admin operations.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use coterie_common::AppResult;
use coterie_store::{
    CREATED_AT_FIELD, DocumentStore, collections, records::AuditLogEntry, to_fields,
};

use super::authorization::AdminActor;
use super::cascade::CascadeOutcome;

/// Action name recorded for user deletions.
const ACTION_DELETE_USER: &str = "deleteUser";

/// An audit entry read back from the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogRecord {
    /// Store-assigned document id.
    pub id: String,
    /// Store-assigned append time, RFC 3339.
    pub created_at: Option<String>,
    /// The recorded entry.
    #[serde(flatten)]
    pub entry: AuditLogEntry,
}

/// Writes and reads the append-only `adminLogs` collection.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn DocumentStore>,
}

impl AuditRecorder {
    /// Create a new audit recorder.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append the audit entry for one completed deletion cascade.
    ///
    /// Exactly one entry per successful operation. The store assigns the
    /// `createdAt` timestamp on append.
    pub async fn record_user_deletion(
        &self,
        admin: &AdminActor,
        outcome: &CascadeOutcome,
    ) -> AppResult<()> {
        let entry = AuditLogEntry {
            action: ACTION_DELETE_USER.to_string(),
            admin_uid: admin.user_id.clone(),
            admin_email: admin.email.clone(),
            target_user_id: outcome.target_user_id.clone(),
            target_user_email: outcome.target_email.clone(),
            details: outcome.counts.clone(),
        };

        let fields = to_fields(&entry)?;
        let doc = self.store.append(collections::ADMIN_LOGS, fields).await?;
        info!(
            audit_id = %doc.id,
            admin_uid = %admin.user_id,
            target_user_id = %outcome.target_user_id,
            "recorded deleteUser audit entry"
        );
        Ok(())
    }

    /// The most recent audit entries, newest first.
    pub async fn list_recent(&self, limit: u64) -> AppResult<Vec<AuditLogRecord>> {
        let mut docs = self.store.list(collections::ADMIN_LOGS).await?;
        docs.sort_by(|a, b| {
            b.str_field(CREATED_AT_FIELD)
                .cmp(&a.str_field(CREATED_AT_FIELD))
        });
        docs.truncate(limit as usize);

        docs.into_iter()
            .map(|doc| {
                let entry: AuditLogEntry = doc.decode()?;
                Ok(AuditLogRecord {
                    created_at: doc.str_field(CREATED_AT_FIELD).map(ToString::to_string),
                    id: doc.id,
                    entry,
                })
            })
            .collect()
    }
}
