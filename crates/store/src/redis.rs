//! Redis-backed document store.
//!
//! Documents are JSON strings at `{prefix}:doc:{collection}:{id}`; each
//! collection keeps a set of its ids at `{prefix}:ids:{collection}` so that
//! listing does not depend on `SCAN`. Writes touch one document at a time,
//! field updates are read-modify-write and last write wins.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fred::clients::Client as RedisClient;
use fred::interfaces::{KeysInterface, SetsInterface};
use serde_json::Value;
use tracing::debug;

use coterie_common::{AppError, AppResult, IdGenerator};

use crate::document::{CREATED_AT_FIELD, Document, DocumentStore, Fields};

/// Redis [`DocumentStore`] implementation.
#[derive(Clone)]
pub struct RedisStore {
    redis: Arc<RedisClient>,
    prefix: String,
    id_gen: IdGenerator,
}

impl RedisStore {
    /// Create a store over an already connected client.
    #[must_use]
    pub const fn new(redis: Arc<RedisClient>, prefix: String) -> Self {
        Self {
            redis,
            prefix,
            id_gen: IdGenerator::new(),
        }
    }

    /// Key holding one document's JSON payload.
    fn doc_key(&self, collection: &str, id: &str) -> String {
        format!("{}:doc:{collection}:{id}", self.prefix)
    }

    /// Key holding the id set of a collection.
    fn ids_key(&self, collection: &str) -> String {
        format!("{}:ids:{collection}", self.prefix)
    }

    fn parse_fields(collection: &str, id: &str, json_str: &str) -> AppResult<Fields> {
        serde_json::from_str(json_str)
            .map_err(|e| AppError::Store(format!("malformed document {collection}/{id}: {e}")))
    }

    async fn write_fields(&self, collection: &str, id: &str, fields: &Fields) -> AppResult<()> {
        let json_str = serde_json::to_string(fields)
            .map_err(|e| AppError::Store(format!("document serialization failed: {e}")))?;
        self.redis
            .set::<(), _, _>(self.doc_key(collection, id), json_str, None, None, false)
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let json_str: Option<String> = self
            .redis
            .get(self.doc_key(collection, id))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        match json_str {
            Some(json_str) => {
                let fields = Self::parse_fields(collection, id, &json_str)?;
                Ok(Some(Document::new(id, fields)))
            }
            None => Ok(None),
        }
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Document>> {
        // Field values are not indexed, so a predicate query reads the
        // whole collection and filters client-side.
        let docs = self.list(collection).await?;
        Ok(docs
            .into_iter()
            .filter(|doc| doc.fields.get(field) == Some(value))
            .collect())
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        let ids: Vec<String> = self
            .redis
            .smembers(self.ids_key(collection))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| self.doc_key(collection, id)).collect();
        let payloads: Vec<Option<String>> = self
            .redis
            .mget(keys)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let mut docs = Vec::with_capacity(ids.len());
        for (id, payload) in ids.into_iter().zip(payloads) {
            match payload {
                Some(json_str) => {
                    let fields = Self::parse_fields(collection, &id, &json_str)?;
                    docs.push(Document::new(id, fields));
                }
                // Id set and values can drift if a DEL half-landed; the
                // remaining SREM makes the next delete converge.
                None => debug!(collection, id = %id, "indexed id without document payload"),
            }
        }
        Ok(docs)
    }

    async fn append(&self, collection: &str, mut fields: Fields) -> AppResult<Document> {
        let id = self.id_gen.generate();
        fields.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        self.write_fields(collection, &id, &fields).await?;
        self.redis
            .sadd::<(), _, _>(self.ids_key(collection), id.clone())
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(Document::new(id, fields))
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> AppResult<()> {
        let json_str: Option<String> = self
            .redis
            .get(self.doc_key(collection, id))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let Some(json_str) = json_str else {
            return Err(AppError::Store(format!(
                "document not found: {collection}/{id}"
            )));
        };

        let mut fields = Self::parse_fields(collection, id, &json_str)?;
        fields.insert(field.to_string(), value);
        self.write_fields(collection, id, &fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.redis
            .srem::<(), _, _>(self.ids_key(collection), id)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        self.redis
            .del::<(), _>(self.doc_key(collection, id))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }
}
