//! API integration tests.
//!
//! These tests drive the full router, auth middleware included, against
//! in-memory backends.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use coterie_api::{
    middleware::{AppState, auth_middleware},
    router as api_router,
};
use coterie_core::{AuditRecorder, AuthorizationService, CascadeExecutor, UserDeletionService};
use coterie_store::{Fields, MemoryIdentityProvider, MemoryStore, collections};
use serde_json::{Value, json};
use tower::ServiceExt;

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

/// Create the app over in-memory backends, returning handles for seeding.
fn create_test_app() -> (Router, Arc<MemoryStore>, Arc<MemoryIdentityProvider>) {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(MemoryIdentityProvider::new());

    let state = AppState {
        deletion_service: UserDeletionService::new(
            AuthorizationService::new(store.clone()),
            CascadeExecutor::new(store.clone(), identity.clone()),
            AuditRecorder::new(store.clone()),
        ),
        authorization_service: AuthorizationService::new(store.clone()),
        audit_recorder: AuditRecorder::new(store.clone()),
        identity: identity.clone(),
    };

    let app = Router::new()
        .nest("/api", api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    (app, store, identity)
}

async fn seed_user(store: &MemoryStore, id: &str, is_admin: bool) {
    store
        .insert(
            collections::USERS,
            id,
            fields(json!({"email": format!("{id}@example.com"), "isAdmin": is_admin})),
        )
        .await;
}

/// Seed an admin and a deletable target, returning their bearer tokens.
async fn seed_admin_and_target(
    store: &MemoryStore,
    identity: &MemoryIdentityProvider,
) -> (String, String) {
    seed_user(store, "admin-1", true).await;
    seed_user(store, "u1", false).await;
    identity.register("admin-1").await;
    identity.register("u1").await;
    let admin_token = identity.issue_token("admin-1").await;
    let user_token = identity.issue_token("u1").await;
    (admin_token, user_token)
}

fn post_json(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_delete_without_token_returns_unauthenticated() {
    let (app, store, identity) = create_test_app();
    seed_admin_and_target(&store, &identity).await;

    let response = app
        .oneshot(post_json(
            "/api/admin/users/delete",
            None,
            r#"{"userId":"u1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    assert_eq!(body["error"]["message"], "User must be authenticated.");
    assert!(store.get(collections::USERS, "u1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_with_non_admin_token_returns_forbidden() {
    let (app, store, identity) = create_test_app();
    let (_admin_token, user_token) = seed_admin_and_target(&store, &identity).await;

    let response = app
        .oneshot(post_json(
            "/api/admin/users/delete",
            Some(&user_token),
            r#"{"userId":"admin-1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");
    assert_eq!(body["error"]["message"], "Only admins can delete users.");
    assert!(
        store
            .get(collections::USERS, "admin-1")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_delete_with_missing_user_id_returns_bad_request() {
    let (app, store, identity) = create_test_app();
    let (admin_token, _) = seed_admin_and_target(&store, &identity).await;

    let response = app
        .oneshot(post_json("/api/admin/users/delete", Some(&admin_token), "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_delete_with_blank_user_id_returns_bad_request() {
    let (app, store, identity) = create_test_app();
    let (admin_token, _) = seed_admin_and_target(&store, &identity).await;

    let response = app
        .oneshot(post_json(
            "/api/admin/users/delete",
            Some(&admin_token),
            r#"{"userId":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("userId is required.")
    );
}

#[tokio::test]
async fn test_delete_with_unknown_fields_returns_bad_request() {
    let (app, store, identity) = create_test_app();
    let (admin_token, _) = seed_admin_and_target(&store, &identity).await;

    let response = app
        .oneshot(post_json(
            "/api/admin/users/delete",
            Some(&admin_token),
            r#"{"userId":"u1","force":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.get(collections::USERS, "u1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_with_invalid_json_returns_client_error() {
    let (app, store, identity) = create_test_app();
    let (admin_token, _) = seed_admin_and_target(&store, &identity).await;

    let response = app
        .oneshot(post_json(
            "/api/admin/users/delete",
            Some(&admin_token),
            "not json",
        ))
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
    assert!(store.get(collections::USERS, "u1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_unknown_target_returns_not_found() {
    let (app, store, identity) = create_test_app();
    let (admin_token, _) = seed_admin_and_target(&store, &identity).await;

    let response = app
        .oneshot(post_json(
            "/api/admin/users/delete",
            Some(&admin_token),
            r#"{"userId":"ghost"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "User not found.");
    assert_eq!(store.count(collections::ADMIN_LOGS).await, 0);
}

#[tokio::test]
async fn test_delete_user_cascades_and_audits() {
    let (app, store, identity) = create_test_app();
    let (admin_token, _) = seed_admin_and_target(&store, &identity).await;
    store
        .insert(collections::POSTS, "p1", fields(json!({"userId": "u1"})))
        .await;
    store
        .insert(collections::POSTS, "p2", fields(json!({"userId": "u1"})))
        .await;
    store
        .insert(collections::LIKES, "l1", fields(json!({"userId": "u1"})))
        .await;
    store
        .insert(
            collections::GROUPS,
            "g1",
            fields(json!({"members": ["u1", "u2"]})),
        )
        .await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admin/users/delete",
            Some(&admin_token),
            r#"{"userId":"u1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["message"],
        "User and all related data deleted successfully"
    );

    assert!(store.get(collections::USERS, "u1").await.unwrap().is_none());
    assert_eq!(store.count(collections::POSTS).await, 0);
    assert_eq!(store.count(collections::LIKES).await, 0);
    let g1 = store.get(collections::GROUPS, "g1").await.unwrap().unwrap();
    assert_eq!(g1.fields.get("members"), Some(&json!(["u2"])));
    assert!(!identity.contains("u1").await);
    assert_eq!(store.count(collections::ADMIN_LOGS).await, 1);

    // A second delete finds nothing and records nothing.
    let response = app
        .oneshot(post_json(
            "/api/admin/users/delete",
            Some(&admin_token),
            r#"{"userId":"u1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.count(collections::ADMIN_LOGS).await, 1);
}

#[tokio::test]
async fn test_logs_list_requires_admin() {
    let (app, store, identity) = create_test_app();
    let (_admin_token, user_token) = seed_admin_and_target(&store, &identity).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/admin/logs/list", None, "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(post_json("/api/admin/logs/list", Some(&user_token), "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logs_list_returns_recorded_deletions() {
    let (app, store, identity) = create_test_app();
    let (admin_token, _) = seed_admin_and_target(&store, &identity).await;
    store
        .insert(collections::POSTS, "p1", fields(json!({"userId": "u1"})))
        .await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admin/users/delete",
            Some(&admin_token),
            r#"{"userId":"u1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            "/api/admin/logs/list",
            Some(&admin_token),
            r#"{"limit": 5}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let logs = body.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["action"], "deleteUser");
    assert_eq!(logs[0]["adminUid"], "admin-1");
    assert_eq!(logs[0]["adminEmail"], "admin-1@example.com");
    assert_eq!(logs[0]["targetUserId"], "u1");
    assert_eq!(logs[0]["targetUserEmail"], "u1@example.com");
    assert_eq!(logs[0]["details"]["postsDeleted"], json!(1));
    assert!(logs[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_meta_endpoint_is_public() {
    let (app, _store, _identity) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/meta")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "coterie-admin");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let (app, _store, _identity) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
