//! Document model and the document-store seam.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use coterie_common::{AppError, AppResult};

/// Field name of the store-assigned creation timestamp (RFC 3339).
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Field map of a stored document.
pub type Fields = Map<String, Value>;

/// A document stored in a named collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Unique key within the collection.
    pub id: String,
    /// Document payload.
    pub fields: Fields,
}

impl Document {
    /// Create a document from an id and its payload.
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Borrow a string field, `None` when absent or not a string.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Read a boolean field, `None` when absent or not a boolean.
    #[must_use]
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }

    /// Deserialize the payload into a typed record.
    ///
    /// Fields the record does not declare are ignored, so documents may
    /// carry more data than any single reader consumes.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| AppError::Store(format!("malformed document {}: {e}", self.id)))
    }
}

/// Serialize a record into a document field map.
pub fn to_fields<T: Serialize>(record: &T) -> AppResult<Fields> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Store(
            "record did not serialize to an object".to_string(),
        )),
        Err(e) => Err(AppError::Store(format!("record serialization failed: {e}"))),
    }
}

/// Collection-scoped primitives of the backing document store.
///
/// One handle is constructed at startup and shared across every service;
/// implementations must be safe for concurrent use. Individual operations
/// are atomic per document, there are no cross-document transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point lookup by document id.
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// All documents whose `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Document>>;

    /// Every document in a collection.
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>>;

    /// Append a new document with a store-assigned id and `createdAt`.
    async fn append(&self, collection: &str, fields: Fields) -> AppResult<Document>;

    /// Overwrite a single field of an existing document.
    ///
    /// Errors when the document does not exist.
    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> AppResult<()>;

    /// Delete a document. Deleting an absent id is a no-op.
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;
}
