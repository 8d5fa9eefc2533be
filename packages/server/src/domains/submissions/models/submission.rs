use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::{CoreError, FormatId, SubmissionId, UserId};

/// Lifecycle status of a submission.
///
/// The string literals are persisted and must be preserved exactly for
/// compatibility with existing stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    /// Terminal for the current validation cycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Approved | SubmissionStatus::Rejected)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// Submission model - one user's filled instance of a format.
///
/// `data` maps variable names to scalar values; keys outside the format's
/// variable defs are tolerated and render as empty. Status transitions only
/// via the lifecycle actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub format_id: FormatId,
    pub submitter_id: UserId,
    pub data: Map<String, Value>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: i64,
    format_id: i64,
    submitter_id: i64,
    data: Value,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = CoreError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let data = match row.data {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(CoreError::Storage(format!(
                    "submission data is not an object: {other}"
                )))
            }
        };
        Ok(Submission {
            id: SubmissionId::from_i64(row.id),
            format_id: FormatId::from_i64(row.format_id),
            submitter_id: UserId::from_i64(row.submitter_id),
            data,
            status: row.status.parse().map_err(CoreError::Storage)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Submission {
    /// Insert a new submission in `pending`
    pub async fn insert(
        format_id: FormatId,
        submitter_id: UserId,
        data: &Map<String, Value>,
        pool: &PgPool,
    ) -> Result<Self, CoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "INSERT INTO submissions (format_id, submitter_id, data, status)
             VALUES ($1, $2, $3, 'pending')
             RETURNING *",
        )
        .bind(format_id.into_i64())
        .bind(submitter_id.into_i64())
        .bind(Value::Object(data.clone()))
        .fetch_one(pool)
        .await?;
        row.try_into()
    }

    /// Find submission by id
    pub async fn find_by_id(id: SubmissionId, pool: &PgPool) -> Result<Option<Self>, CoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions WHERE id = $1")
            .bind(id.into_i64())
            .fetch_optional(pool)
            .await?;
        row.map(Submission::try_from).transpose()
    }

    /// Find all submissions by a submitter, newest first
    pub async fn find_by_submitter(
        submitter_id: UserId,
        pool: &PgPool,
    ) -> Result<Vec<Self>, CoreError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            "SELECT * FROM submissions WHERE submitter_id = $1 ORDER BY created_at DESC",
        )
        .bind(submitter_id.into_i64())
        .fetch_all(pool)
        .await?;
        rows.into_iter().map(Submission::try_from).collect()
    }

    /// Find every submission, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, CoreError> {
        let rows =
            sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?;
        rows.into_iter().map(Submission::try_from).collect()
    }

    /// Find submissions whose current status is `pending`, oldest first
    /// (validators work the queue in arrival order)
    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>, CoreError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            "SELECT * FROM submissions WHERE status = 'pending' ORDER BY created_at ASC",
        )
        .fetch_all(pool)
        .await?;
        rows.into_iter().map(Submission::try_from).collect()
    }

    /// Replace the submission's data
    pub async fn update_data(
        id: SubmissionId,
        data: &Map<String, Value>,
        pool: &PgPool,
    ) -> Result<Option<Self>, CoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "UPDATE submissions SET data = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id.into_i64())
        .bind(Value::Object(data.clone()))
        .fetch_optional(pool)
        .await?;
        row.map(Submission::try_from).transpose()
    }

    /// Compare-and-set status transition.
    ///
    /// The row moves to `to` only if its status still equals `from`; a
    /// `None` return means the guard did not hold at commit time (the race
    /// was lost or the submission is gone). This is the serialization point
    /// for concurrent `decide` calls.
    pub async fn transition_status(
        id: SubmissionId,
        from: SubmissionStatus,
        to: SubmissionStatus,
        pool: &PgPool,
    ) -> Result<Option<Self>, CoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "UPDATE submissions
             SET status = $3, updated_at = NOW()
             WHERE id = $1
               AND status = $2
             RETURNING *",
        )
        .bind(id.into_i64())
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(pool)
        .await?;
        row.map(Submission::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_are_stable() {
        assert_eq!(SubmissionStatus::Pending.as_str(), "pending");
        assert_eq!(SubmissionStatus::Approved.as_str(), "approved");
        assert_eq!(SubmissionStatus::Rejected.as_str(), "rejected");
        for s in ["pending", "approved", "rejected"] {
            assert_eq!(s.parse::<SubmissionStatus>().unwrap().as_str(), s);
        }
    }

    #[test]
    fn terminal_states() {
        assert!(!SubmissionStatus::Pending.is_terminal());
        assert!(SubmissionStatus::Approved.is_terminal());
        assert!(SubmissionStatus::Rejected.is_terminal());
    }
}
