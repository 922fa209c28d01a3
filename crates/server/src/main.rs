//! Coterie admin server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use coterie_api::{middleware::AppState, router as api_router};
use coterie_common::{Config, IdentityConfig, StoreConfig};
use coterie_core::{AuditRecorder, AuthorizationService, CascadeExecutor, UserDeletionService};
use coterie_store::{
    DocumentStore, HttpIdentityProvider, IdentityProvider, MemoryIdentityProvider, MemoryStore,
    RedisStore,
};
use fred::prelude::*;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for SIGINT or SIGTERM (Ctrl+C only on non-Unix targets).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Build the configured document store backend.
async fn build_store(
    config: &StoreConfig,
) -> Result<Arc<dyn DocumentStore>, Box<dyn std::error::Error>> {
    match config {
        StoreConfig::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreConfig::Redis { url, prefix } => {
            info!("Connecting to Redis...");
            let redis_config = fred::types::config::Config::from_url(url)?;
            let redis_client = fred::clients::Client::new(redis_config, None, None, None);
            redis_client.connect();
            redis_client.wait_for_connect().await?;
            info!("Connected to Redis document store");
            Ok(Arc::new(RedisStore::new(
                Arc::new(redis_client),
                prefix.clone(),
            )))
        }
    }
}

/// Build the configured identity provider backend.
fn build_identity(config: &IdentityConfig) -> Arc<dyn IdentityProvider> {
    match config {
        IdentityConfig::Memory => {
            info!("Using in-memory identity provider");
            Arc::new(MemoryIdentityProvider::new())
        }
        IdentityConfig::Http {
            base_url,
            api_token,
        } => {
            info!(base_url = %base_url, "Using HTTP identity provider");
            Arc::new(HttpIdentityProvider::new(
                base_url.clone(),
                api_token.clone(),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coterie=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting coterie admin server...");

    // Load configuration
    let config = Config::load()?;

    let store = build_store(&config.store).await?;
    let identity = build_identity(&config.identity);

    // Wire services
    let authorization_service = AuthorizationService::new(store.clone());
    let audit_recorder = AuditRecorder::new(store.clone());
    let deletion_service = UserDeletionService::new(
        authorization_service.clone(),
        CascadeExecutor::new(store.clone(), identity.clone()),
        audit_recorder.clone(),
    );

    let state = AppState {
        deletion_service,
        authorization_service,
        audit_recorder,
        identity,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            coterie_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
