//! Create submission action - entry edge of the lifecycle.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::common::{Actor, Capability, CoreError, FormatId, Principal, UserId};
use crate::domains::formats::models::format::FormatStatus;
use crate::domains::notifications::actions::notify_all;
use crate::domains::submissions::events::SubmissionEvent;
use crate::kernel::ServerDeps;

/// Create a submission against an active format.
///
/// Persists the submission in `pending` together with its validation shell,
/// then fans out a notification to every validator. The fan-out is best
/// effort: an unreachable validator never fails the creation.
pub async fn create_submission(
    deps: &ServerDeps,
    principal: &Principal,
    format_id: FormatId,
    data: Map<String, Value>,
) -> Result<SubmissionEvent, CoreError> {
    Actor::new(principal)
        .can(Capability::CreateSubmission)
        .check()?;

    let format = deps
        .store(deps.formats.find_by_id(format_id))
        .await?
        .ok_or(CoreError::NotFound("format", format_id.into_i64()))?;

    if format.status != FormatStatus::Active {
        return Err(CoreError::Validation(format!(
            "format '{}' is inactive and does not accept submissions",
            format.title
        )));
    }

    let submission = deps
        .store(deps.submissions.insert(format_id, principal.id, &data))
        .await?;
    let validation = deps
        .store(deps.validations.insert_shell(submission.id))
        .await?;

    debug!(
        "Submission {} created against format {} by user {}",
        submission.id, format_id, principal.id
    );

    let validators = deps.store(deps.directory.find_validators()).await?;
    let recipients: Vec<UserId> = validators.iter().map(|v| v.id).collect();
    let message = format!(
        "{} submitted by {} requires validation",
        format.title, principal.display_name
    );
    let delivered = notify_all(deps, &recipients, &message).await;

    info!(
        "Submission {} is pending validation ({}/{} validators notified)",
        submission.id,
        delivered.len(),
        recipients.len()
    );

    Ok(SubmissionEvent::SubmissionCreated {
        submission,
        validation,
        notified: delivered.len(),
    })
}
