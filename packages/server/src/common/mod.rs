// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;

pub use auth::{Actor, Capability, Principal, Role};
pub use entity_ids::{FormatId, NotificationId, SubmissionId, UserId, ValidationId};
pub use errors::CoreError;
pub use id::Id;
