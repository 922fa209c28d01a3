//! API response types.

use serde::Serialize;

/// Response body for state-changing admin operations.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    /// Always `true`; failures return the error envelope instead.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

impl OperationResponse {
    /// Create a success response carrying the given message.
    #[must_use]
    pub const fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
