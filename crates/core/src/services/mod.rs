//! Business logic services.

pub mod audit;
pub mod authorization;
pub mod cascade;
pub mod deletion;

pub use audit::{AuditLogRecord, AuditRecorder};
pub use authorization::{AdminActor, AuthorizationService};
pub use cascade::{CascadeExecutor, CascadeOutcome};
pub use deletion::{DeleteUserInput, DeletionReceipt, UserDeletionService};
