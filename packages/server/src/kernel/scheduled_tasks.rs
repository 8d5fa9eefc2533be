//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Currently one periodic task: the notification retention sweep, deleting
//! read notifications once they fall behind the retention window.
//!
//! The scheduler has an explicit start/shutdown lifecycle; the returned
//! handle is kept by the server and shut down on exit, so no ambient global
//! timers survive the process.

use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::notifications::actions::{default_retention, stats, sweep};
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: Arc<ServerDeps>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Notification retention sweep - runs daily at 03:00
    let sweep_deps = deps.clone();
    let sweep_job = Job::new_async("0 0 3 * * *", move |_uuid, _lock| {
        let deps = sweep_deps.clone();
        Box::pin(async move {
            if let Err(e) = run_notification_sweep(&deps, default_retention()).await {
                tracing::error!("Notification sweep task failed: {}", e);
            }
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (notification sweep daily at 03:00)");
    Ok(scheduler)
}

/// Run the notification retention sweep with stats logging
async fn run_notification_sweep(
    deps: &ServerDeps,
    retention: Duration,
) -> Result<(), crate::common::CoreError> {
    tracing::info!("Running notification sweep task");

    let before = stats(deps, retention).await?;
    tracing::info!(
        "Notification stats before sweep: {} total, {} read, {} unread, {} expired",
        before.total,
        before.read,
        before.unread,
        before.expired
    );

    let deleted = sweep(deps, retention).await?;

    tracing::info!("Notification sweep complete: {} notifications deleted", deleted);
    Ok(())
}
