// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "decide a submission") lives in domain actions that
// use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseSubmissionStore)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::common::{
    CoreError, FormatId, NotificationId, Principal, SubmissionId, UserId, ValidationId,
};
use crate::domains::documents::renderer::PageConfig;
use crate::domains::formats::models::format::{Format, FormatChanges, FormatStatus, NewFormat};
use crate::domains::notifications::models::notification::{Notification, NotificationStats};
use crate::domains::submissions::models::submission::{Submission, SubmissionStatus};
use crate::domains::submissions::models::validation::Validation;

// =============================================================================
// Storage Traits (Infrastructure - typed CRUD over the storage collaborator)
// =============================================================================

#[async_trait]
pub trait BaseFormatStore: Send + Sync {
    async fn insert(&self, new: &NewFormat) -> Result<Format, CoreError>;

    async fn find_by_id(&self, id: FormatId) -> Result<Option<Format>, CoreError>;

    async fn find_active(&self) -> Result<Vec<Format>, CoreError>;

    async fn update(
        &self,
        id: FormatId,
        changes: &FormatChanges,
    ) -> Result<Option<Format>, CoreError>;

    async fn set_status(
        &self,
        id: FormatId,
        status: FormatStatus,
    ) -> Result<Option<Format>, CoreError>;

    /// Whether any submission references this format.
    async fn is_referenced(&self, id: FormatId) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait BaseSubmissionStore: Send + Sync {
    async fn insert(
        &self,
        format_id: FormatId,
        submitter_id: UserId,
        data: &Map<String, Value>,
    ) -> Result<Submission, CoreError>;

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, CoreError>;

    async fn find_by_submitter(&self, submitter_id: UserId) -> Result<Vec<Submission>, CoreError>;

    async fn find_all(&self) -> Result<Vec<Submission>, CoreError>;

    /// Submissions whose current status is `pending`, oldest first.
    async fn find_pending(&self) -> Result<Vec<Submission>, CoreError>;

    async fn update_data(
        &self,
        id: SubmissionId,
        data: &Map<String, Value>,
    ) -> Result<Option<Submission>, CoreError>;

    /// Compare-and-set status transition: succeeds only if the stored status
    /// still equals `from`. `None` means the guard did not hold at commit
    /// time. This is the serialization point for concurrent decisions.
    async fn transition_status(
        &self,
        id: SubmissionId,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<Option<Submission>, CoreError>;
}

#[async_trait]
pub trait BaseValidationStore: Send + Sync {
    /// Create a fresh pending shell for a submission.
    async fn insert_shell(&self, submission_id: SubmissionId) -> Result<Validation, CoreError>;

    async fn find_by_id(&self, id: ValidationId) -> Result<Option<Validation>, CoreError>;

    /// The open (still pending) validation for a submission, if any.
    async fn find_open_by_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Option<Validation>, CoreError>;

    /// Full validation history for a submission, oldest cycle first.
    async fn find_by_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<Validation>, CoreError>;

    /// Record the decision on an open shell.
    async fn finalize(
        &self,
        id: ValidationId,
        validator_id: UserId,
        decision: SubmissionStatus,
        observations: Option<&str>,
    ) -> Result<Option<Validation>, CoreError>;
}

#[async_trait]
pub trait BaseNotificationStore: Send + Sync {
    async fn insert(&self, recipient_id: UserId, message: &str)
        -> Result<Notification, CoreError>;

    /// All notifications for a recipient, newest first.
    async fn find_by_recipient(&self, recipient_id: UserId)
        -> Result<Vec<Notification>, CoreError>;

    /// Flip `read` on. Returns rows touched; 0 covers both a missing id and
    /// an already-read record.
    async fn mark_read(&self, id: NotificationId) -> Result<u64, CoreError>;

    /// Delete read notifications whose `updated_at` is before the cutoff.
    async fn delete_read_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, CoreError>;

    async fn stats(&self, cutoff: DateTime<Utc>) -> Result<NotificationStats, CoreError>;
}

// =============================================================================
// Principal Directory Trait (Infrastructure - the auth collaborator's view)
// =============================================================================

#[async_trait]
pub trait BasePrincipalDirectory: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Principal>, CoreError>;

    /// Everyone holding the validator capability (validator and admin roles).
    async fn find_validators(&self) -> Result<Vec<Principal>, CoreError>;
}

// =============================================================================
// PDF Renderer Trait (Infrastructure - the visual rendering collaborator)
// =============================================================================

#[async_trait]
pub trait BasePdfRenderer: Send + Sync {
    /// Render HTML into PDF bytes with the given page configuration.
    async fn render(&self, html: &str, page: &PageConfig) -> Result<Vec<u8>, CoreError>;
}
