use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CoreError, NotificationId, UserId};

/// Notification record - a message for one recipient, polled by clients.
///
/// Mutated only to flip `read`; the retention sweep deletes read records
/// once `updated_at` falls behind the cutoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    recipient_id: i64,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: NotificationId::from_i64(row.id),
            recipient_id: UserId::from_i64(row.recipient_id),
            message: row.message,
            read: row.read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Counts reported by the scheduled sweep's logging.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NotificationStats {
    pub total: u64,
    pub read: u64,
    pub unread: u64,
    /// Read records already past the retention cutoff.
    pub expired: u64,
}

impl Notification {
    /// Insert an unread notification
    pub async fn insert(
        recipient_id: UserId,
        message: &str,
        pool: &PgPool,
    ) -> Result<Self, CoreError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            "INSERT INTO notifications (recipient_id, message, read)
             VALUES ($1, $2, false)
             RETURNING *",
        )
        .bind(recipient_id.into_i64())
        .bind(message)
        .fetch_one(pool)
        .await?;
        Ok(row.into())
    }

    /// All notifications for a recipient, newest first
    pub async fn find_by_recipient(
        recipient_id: UserId,
        pool: &PgPool,
    ) -> Result<Vec<Self>, CoreError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT * FROM notifications WHERE recipient_id = $1 ORDER BY created_at DESC",
        )
        .bind(recipient_id.into_i64())
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Flip `read` on. Returns the number of rows touched; 0 covers both a
    /// missing id and an already-read record, which callers treat as a no-op.
    pub async fn mark_read(id: NotificationId, pool: &PgPool) -> Result<u64, CoreError> {
        let result = sqlx::query(
            "UPDATE notifications SET read = true, updated_at = NOW()
             WHERE id = $1 AND read = false",
        )
        .bind(id.into_i64())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete read notifications whose `updated_at` is before the cutoff
    pub async fn delete_read_older_than(
        cutoff: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<u64, CoreError> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE read = true AND updated_at < $1")
                .bind(cutoff)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Aggregate counts for sweep logging
    pub async fn stats(cutoff: DateTime<Utc>, pool: &PgPool) -> Result<NotificationStats, CoreError> {
        let (total, read, expired): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE read),
                COUNT(*) FILTER (WHERE read AND updated_at < $1)
             FROM notifications",
        )
        .bind(cutoff)
        .fetch_one(pool)
        .await?;
        Ok(NotificationStats {
            total: total as u64,
            read: read as u64,
            unread: (total - read) as u64,
            expired: expired as u64,
        })
    }
}
