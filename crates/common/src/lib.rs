//! Common utilities and shared types for the coterie admin service.
//!
//! This crate provides foundational components used across all coterie crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use coterie_common::{AppResult, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {id}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::{Config, IdentityConfig, ServerConfig, StoreConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
