//! Typed id definitions for all domain entities.
//!
//! Type aliases over `Id<T>` give compile-time safety for id usage
//! throughout the application.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Format entities (document templates).
pub struct Format;

/// Marker type for Submission entities (filled format instances).
pub struct Submission;

/// Marker type for Validation entities (approval decisions).
pub struct Validation;

/// Marker type for Notification entities.
pub struct Notification;

/// Marker type for User entities (principals).
pub struct User;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed id for Format entities.
pub type FormatId = Id<Format>;

/// Typed id for Submission entities.
pub type SubmissionId = Id<Submission>;

/// Typed id for Validation entities.
pub type ValidationId = Id<Validation>;

/// Typed id for Notification entities.
pub type NotificationId = Id<Notification>;

/// Typed id for User entities.
pub type UserId = Id<User>;
