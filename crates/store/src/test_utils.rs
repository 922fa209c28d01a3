//! Test utilities for store operations.
//!
//! Provides decorated [`DocumentStore`] implementations for exercising
//! failure paths and asserting on store traffic, plus a deliberately
//! broken identity provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use coterie_common::{AppError, AppResult};

use crate::document::{Document, DocumentStore, Fields};
use crate::identity::{Caller, IdentityError, IdentityProvider};
use crate::memory::MemoryStore;

/// Store wrapper that fails every operation touching one collection.
pub struct FailingStore {
    inner: Arc<MemoryStore>,
    fail_collection: String,
}

impl FailingStore {
    /// Wrap `inner`, failing all operations on `fail_collection`.
    #[must_use]
    pub fn new(inner: Arc<MemoryStore>, fail_collection: impl Into<String>) -> Self {
        Self {
            inner,
            fail_collection: fail_collection.into(),
        }
    }

    fn check(&self, collection: &str) -> AppResult<()> {
        if collection == self.fail_collection {
            return Err(AppError::Store(format!(
                "simulated store failure on {collection}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        self.check(collection)?;
        self.inner.get(collection, id).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Document>> {
        self.check(collection)?;
        self.inner.find_by_field(collection, field, value).await
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        self.check(collection)?;
        self.inner.list(collection).await
    }

    async fn append(&self, collection: &str, fields: Fields) -> AppResult<Document> {
        self.check(collection)?;
        self.inner.append(collection, fields).await
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> AppResult<()> {
        self.check(collection)?;
        self.inner.update_field(collection, id, field, value).await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.check(collection)?;
        self.inner.delete(collection, id).await
    }
}

/// Store wrapper that counts reads and writes.
pub struct CountingStore {
    inner: Arc<MemoryStore>,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl CountingStore {
    /// Wrap `inner` with zeroed counters.
    #[must_use]
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of read operations (`get`, `find_by_field`, `list`) so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write operations (`append`, `update_field`, `delete`) so far.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(collection, id).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Document>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_field(collection, field, value).await
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list(collection).await
    }

    async fn append(&self, collection: &str, fields: Fields) -> AppResult<Document> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.append(collection, fields).await
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_field(collection, id, field, value).await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(collection, id).await
    }
}

/// Identity provider whose deletions always fail with a provider error.
#[derive(Default)]
pub struct BrokenIdentityProvider {
    _private: (),
}

impl BrokenIdentityProvider {
    /// Create the provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[async_trait]
impl IdentityProvider for BrokenIdentityProvider {
    async fn verify_token(&self, _token: &str) -> AppResult<Option<Caller>> {
        Ok(None)
    }

    async fn delete_identity(&self, _user_id: &str) -> Result<(), IdentityError> {
        Err(IdentityError::Provider(
            "simulated provider outage".to_string(),
        ))
    }
}
