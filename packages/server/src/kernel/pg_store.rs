//! Postgres-backed implementations of the storage traits.
//!
//! Thin adapters: the SQL lives on the domain models
//! (`Model::find_by_id(id, pool)`); these impls just satisfy the `Base*`
//! seams so actions stay storage-agnostic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::common::{
    CoreError, FormatId, NotificationId, Principal, SubmissionId, UserId, ValidationId,
};
use crate::domains::formats::models::format::{Format, FormatChanges, FormatStatus, NewFormat};
use crate::domains::notifications::models::notification::{Notification, NotificationStats};
use crate::domains::submissions::models::submission::{Submission, SubmissionStatus};
use crate::domains::submissions::models::validation::Validation;
use crate::kernel::{
    BaseFormatStore, BaseNotificationStore, BasePrincipalDirectory, BaseSubmissionStore,
    BaseValidationStore,
};

/// One handle implements every store trait; clone freely, the pool is shared.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseFormatStore for PgStore {
    async fn insert(&self, new: &NewFormat) -> Result<Format, CoreError> {
        Format::insert(new, &self.pool).await
    }

    async fn find_by_id(&self, id: FormatId) -> Result<Option<Format>, CoreError> {
        Format::find_by_id(id, &self.pool).await
    }

    async fn find_active(&self) -> Result<Vec<Format>, CoreError> {
        Format::find_active(&self.pool).await
    }

    async fn update(
        &self,
        id: FormatId,
        changes: &FormatChanges,
    ) -> Result<Option<Format>, CoreError> {
        Format::update(id, changes, &self.pool).await
    }

    async fn set_status(
        &self,
        id: FormatId,
        status: FormatStatus,
    ) -> Result<Option<Format>, CoreError> {
        Format::set_status(id, status, &self.pool).await
    }

    async fn is_referenced(&self, id: FormatId) -> Result<bool, CoreError> {
        Format::is_referenced(id, &self.pool).await
    }
}

#[async_trait]
impl BaseSubmissionStore for PgStore {
    async fn insert(
        &self,
        format_id: FormatId,
        submitter_id: UserId,
        data: &Map<String, Value>,
    ) -> Result<Submission, CoreError> {
        Submission::insert(format_id, submitter_id, data, &self.pool).await
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, CoreError> {
        Submission::find_by_id(id, &self.pool).await
    }

    async fn find_by_submitter(&self, submitter_id: UserId) -> Result<Vec<Submission>, CoreError> {
        Submission::find_by_submitter(submitter_id, &self.pool).await
    }

    async fn find_all(&self) -> Result<Vec<Submission>, CoreError> {
        Submission::find_all(&self.pool).await
    }

    async fn find_pending(&self) -> Result<Vec<Submission>, CoreError> {
        Submission::find_pending(&self.pool).await
    }

    async fn update_data(
        &self,
        id: SubmissionId,
        data: &Map<String, Value>,
    ) -> Result<Option<Submission>, CoreError> {
        Submission::update_data(id, data, &self.pool).await
    }

    async fn transition_status(
        &self,
        id: SubmissionId,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<Option<Submission>, CoreError> {
        Submission::transition_status(id, from, to, &self.pool).await
    }
}

#[async_trait]
impl BaseValidationStore for PgStore {
    async fn insert_shell(&self, submission_id: SubmissionId) -> Result<Validation, CoreError> {
        Validation::insert_shell(submission_id, &self.pool).await
    }

    async fn find_by_id(&self, id: ValidationId) -> Result<Option<Validation>, CoreError> {
        Validation::find_by_id(id, &self.pool).await
    }

    async fn find_open_by_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Option<Validation>, CoreError> {
        Validation::find_open_by_submission(submission_id, &self.pool).await
    }

    async fn find_by_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<Validation>, CoreError> {
        Validation::find_by_submission(submission_id, &self.pool).await
    }

    async fn finalize(
        &self,
        id: ValidationId,
        validator_id: UserId,
        decision: SubmissionStatus,
        observations: Option<&str>,
    ) -> Result<Option<Validation>, CoreError> {
        Validation::finalize(id, validator_id, decision, observations, &self.pool).await
    }
}

#[async_trait]
impl BaseNotificationStore for PgStore {
    async fn insert(
        &self,
        recipient_id: UserId,
        message: &str,
    ) -> Result<Notification, CoreError> {
        Notification::insert(recipient_id, message, &self.pool).await
    }

    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Notification>, CoreError> {
        Notification::find_by_recipient(recipient_id, &self.pool).await
    }

    async fn mark_read(&self, id: NotificationId) -> Result<u64, CoreError> {
        Notification::mark_read(id, &self.pool).await
    }

    async fn delete_read_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, CoreError> {
        Notification::delete_read_older_than(cutoff, &self.pool).await
    }

    async fn stats(&self, cutoff: DateTime<Utc>) -> Result<NotificationStats, CoreError> {
        Notification::stats(cutoff, &self.pool).await
    }
}

// =============================================================================
// Principal directory over the auth collaborator's users table
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    display_name: String,
    email: String,
    role: String,
}

impl TryFrom<UserRow> for Principal {
    type Error = CoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Principal {
            id: UserId::from_i64(row.id),
            display_name: row.display_name,
            email: row.email,
            role: row.role.parse().map_err(CoreError::Storage)?,
        })
    }
}

#[async_trait]
impl BasePrincipalDirectory for PgStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Principal>, CoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, display_name, email, role FROM users WHERE id = $1",
        )
        .bind(id.into_i64())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Principal::try_from).transpose()
    }

    async fn find_validators(&self) -> Result<Vec<Principal>, CoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, display_name, email, role FROM users
             WHERE role IN ('validator', 'admin')
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Principal::try_from).collect()
    }
}
