//! Retention sweep over read notifications.

use chrono::{Duration, Utc};
use tracing::info;

use crate::common::CoreError;
use crate::domains::notifications::models::notification::NotificationStats;
use crate::kernel::ServerDeps;

/// Read notifications are kept this long after their last touch.
pub fn default_retention() -> Duration {
    Duration::days(2)
}

/// Delete read notifications whose `updated_at` is older than `now - retention`.
///
/// The cutoff is captured once at sweep start, so records read or created
/// while the sweep runs are never candidates — safe to run concurrently with
/// live `notify`/`mark_read` traffic.
pub async fn sweep(deps: &ServerDeps, retention: Duration) -> Result<u64, CoreError> {
    let cutoff = Utc::now() - retention;
    let deleted = deps
        .store(deps.notifications.delete_read_older_than(cutoff))
        .await?;
    info!("Notification sweep deleted {} read notifications", deleted);
    Ok(deleted)
}

/// Aggregate counts relative to the retention cutoff, for sweep logging.
pub async fn stats(deps: &ServerDeps, retention: Duration) -> Result<NotificationStats, CoreError> {
    let cutoff = Utc::now() - retention;
    deps.store(deps.notifications.stats(cutoff)).await
}
