//! Storage seams for the coterie admin service.
//!
//! This crate defines the external stores the service talks to, their
//! backends, and the data model stored in them:
//!
//! - **Document store**: schemaless collections of JSON documents via
//!   [`DocumentStore`], backed in-memory ([`MemoryStore`]) or by Redis
//!   ([`RedisStore`])
//! - **Identity provider**: the separate credential store via
//!   [`IdentityProvider`], backed in-memory ([`MemoryIdentityProvider`])
//!   or by a remote HTTP service ([`HttpIdentityProvider`])
//! - **Data model**: collection names in [`collections`], typed document
//!   views in [`records`]

pub mod collections;
pub mod document;
pub mod identity;
pub mod memory;
pub mod records;
pub mod redis;
pub mod test_utils;

pub use document::{CREATED_AT_FIELD, Document, DocumentStore, Fields, to_fields};
pub use identity::{
    Caller, HttpIdentityProvider, IdentityError, IdentityProvider, MemoryIdentityProvider,
};
pub use memory::MemoryStore;
pub use redis::RedisStore;
