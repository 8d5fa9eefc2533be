//! Notification creation, listing and read-tracking.

use futures::future::join_all;
use tracing::{debug, error};

use crate::common::{CoreError, NotificationId, UserId};
use crate::domains::notifications::models::notification::Notification;
use crate::kernel::ServerDeps;

/// Create an unread notification for one recipient.
pub async fn notify(
    deps: &ServerDeps,
    recipient_id: UserId,
    message: &str,
) -> Result<Notification, CoreError> {
    debug!("Notifying user {}: {}", recipient_id, message);
    deps.store(deps.notifications.insert(recipient_id, message))
        .await
}

/// Best-effort fan-out to a set of recipients.
///
/// Each write is independent and issued concurrently; a failure for one
/// recipient never blocks the others. Failures are logged and dropped, the
/// successes returned — the caller's transition must not fail because one
/// recipient could not be notified.
pub async fn notify_all(
    deps: &ServerDeps,
    recipients: &[UserId],
    message: &str,
) -> Vec<Notification> {
    let attempts = join_all(
        recipients
            .iter()
            .map(|&recipient| notify(deps, recipient, message)),
    )
    .await;

    let mut delivered = Vec::with_capacity(attempts.len());
    for (recipient, attempt) in recipients.iter().zip(attempts) {
        match attempt {
            Ok(notification) => delivered.push(notification),
            Err(e) => error!("Failed to notify user {}: {}", recipient, e),
        }
    }
    delivered
}

/// All notifications for a user, newest first.
pub async fn list_for(deps: &ServerDeps, user_id: UserId) -> Result<Vec<Notification>, CoreError> {
    deps.store(deps.notifications.find_by_recipient(user_id))
        .await
}

/// Mark a notification read.
///
/// Idempotent by policy: marking an already-read or nonexistent notification
/// is a silent no-op, so clients can retry freely.
pub async fn mark_read(deps: &ServerDeps, id: NotificationId) -> Result<(), CoreError> {
    let touched = deps.store(deps.notifications.mark_read(id)).await?;
    if touched == 0 {
        debug!("mark_read({}) was a no-op", id);
    }
    Ok(())
}
