//! Admin endpoints.
//!
//! Every route here runs through the admin gate; unauthenticated and
//! non-admin callers are rejected before any operation starts.

use axum::{Json, Router, extract::State, routing::post};
use coterie_common::{AppError, AppResult};
use coterie_core::{AuditLogRecord, DeleteUserInput};
use serde::Deserialize;

use crate::{extractors::MaybeAuthCaller, middleware::AppState, response::OperationResponse};

/// List audit logs request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogsRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    10
}

/// Delete a user and every record referencing them (admin only).
///
/// The body is shaped here instead of through `Json<DeleteUserInput>` so a
/// malformed payload surfaces as `InvalidArgument` rather than a bare 422.
async fn delete_user(
    MaybeAuthCaller(caller): MaybeAuthCaller,
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<OperationResponse>> {
    let input: DeleteUserInput =
        serde_json::from_value(body).map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let receipt = state
        .deletion_service
        .delete_user(caller.as_ref(), &input)
        .await?;

    Ok(Json(OperationResponse::ok(receipt.message)))
}

/// List recent audit log entries, newest first (admin only).
async fn list_logs(
    MaybeAuthCaller(caller): MaybeAuthCaller,
    State(state): State<AppState>,
    Json(req): Json<ListLogsRequest>,
) -> AppResult<Json<Vec<AuditLogRecord>>> {
    state
        .authorization_service
        .require_admin(caller.as_ref())
        .await?;

    let logs = state.audit_recorder.list_recent(req.limit.min(100)).await?;

    Ok(Json(logs))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/delete", post(delete_user))
        .route("/logs/list", post(list_logs))
}
