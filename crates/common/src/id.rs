//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for store-assigned document ids and session tokens.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a document id for a store append.
    ///
    /// Lowercase ULID: lexicographically sortable, so listing a collection
    /// by id roughly follows insertion order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque session token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // UUID v4, no time component
        Uuid::new_v4().simple().to_string()
    }
}
