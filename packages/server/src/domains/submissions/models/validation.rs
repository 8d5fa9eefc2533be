use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::submission::SubmissionStatus;
use crate::common::{CoreError, SubmissionId, UserId, ValidationId};

/// Validation model - the approval/rejection decision record attached to a
/// submission.
///
/// A submission carries at most one open ("shell") validation; terminal
/// validations accumulate as history across resubmission cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validation {
    pub id: ValidationId,
    pub submission_id: SubmissionId,
    pub validator_id: Option<UserId>,
    pub status: SubmissionStatus,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ValidationRow {
    id: i64,
    submission_id: i64,
    validator_id: Option<i64>,
    status: String,
    observations: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ValidationRow> for Validation {
    type Error = CoreError;

    fn try_from(row: ValidationRow) -> Result<Self, Self::Error> {
        Ok(Validation {
            id: ValidationId::from_i64(row.id),
            submission_id: SubmissionId::from_i64(row.submission_id),
            validator_id: row.validator_id.map(UserId::from_i64),
            status: row.status.parse().map_err(CoreError::Storage)?,
            observations: row.observations,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Validation {
    /// Insert a fresh pending shell for a submission
    pub async fn insert_shell(
        submission_id: SubmissionId,
        pool: &PgPool,
    ) -> Result<Self, CoreError> {
        let row = sqlx::query_as::<_, ValidationRow>(
            "INSERT INTO validations (submission_id, status)
             VALUES ($1, 'pending')
             RETURNING *",
        )
        .bind(submission_id.into_i64())
        .fetch_one(pool)
        .await?;
        row.try_into()
    }

    /// Find validation by id
    pub async fn find_by_id(id: ValidationId, pool: &PgPool) -> Result<Option<Self>, CoreError> {
        let row = sqlx::query_as::<_, ValidationRow>("SELECT * FROM validations WHERE id = $1")
            .bind(id.into_i64())
            .fetch_optional(pool)
            .await?;
        row.map(Validation::try_from).transpose()
    }

    /// The open (still pending) validation for a submission, if any
    pub async fn find_open_by_submission(
        submission_id: SubmissionId,
        pool: &PgPool,
    ) -> Result<Option<Self>, CoreError> {
        let row = sqlx::query_as::<_, ValidationRow>(
            "SELECT * FROM validations WHERE submission_id = $1 AND status = 'pending'",
        )
        .bind(submission_id.into_i64())
        .fetch_optional(pool)
        .await?;
        row.map(Validation::try_from).transpose()
    }

    /// Full validation history for a submission, oldest cycle first
    pub async fn find_by_submission(
        submission_id: SubmissionId,
        pool: &PgPool,
    ) -> Result<Vec<Self>, CoreError> {
        let rows = sqlx::query_as::<_, ValidationRow>(
            "SELECT * FROM validations WHERE submission_id = $1 ORDER BY created_at ASC",
        )
        .bind(submission_id.into_i64())
        .fetch_all(pool)
        .await?;
        rows.into_iter().map(Validation::try_from).collect()
    }

    /// Record the decision on an open shell
    pub async fn finalize(
        id: ValidationId,
        validator_id: UserId,
        decision: SubmissionStatus,
        observations: Option<&str>,
        pool: &PgPool,
    ) -> Result<Option<Self>, CoreError> {
        let row = sqlx::query_as::<_, ValidationRow>(
            "UPDATE validations
             SET validator_id = $2, status = $3, observations = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id.into_i64())
        .bind(validator_id.into_i64())
        .bind(decision.as_str())
        .bind(observations)
        .fetch_optional(pool)
        .await?;
        row.map(Validation::try_from).transpose()
    }
}
