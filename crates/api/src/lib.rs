//! HTTP API layer for the coterie admin service.
//!
//! This crate provides the REST surface:
//!
//! - **Endpoints**: admin operations and server metadata
//! - **Extractors**: caller identity resolved by the auth middleware
//! - **Middleware**: bearer token authentication
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
