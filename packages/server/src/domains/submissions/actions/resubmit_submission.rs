//! Resubmit action - the rejected → pending re-entry edge.

use serde_json::{Map, Value};
use tracing::info;

use crate::common::{Actor, Capability, CoreError, Principal, SubmissionId, UserId};
use crate::domains::notifications::actions::notify_all;
use crate::domains::submissions::events::SubmissionEvent;
use crate::domains::submissions::models::submission::SubmissionStatus;
use crate::kernel::ServerDeps;

/// Edit and resubmit a rejected submission.
///
/// Resets the status to `pending` in place and opens a fresh validation
/// shell; the rejected cycle's terminal validation stays untouched as
/// history. Validators are re-notified exactly as on creation.
pub async fn resubmit_submission(
    deps: &ServerDeps,
    principal: &Principal,
    submission_id: SubmissionId,
    data: Map<String, Value>,
) -> Result<SubmissionEvent, CoreError> {
    Actor::new(principal)
        .can(Capability::EditSubmission)
        .check()?;

    let submission = deps
        .store(deps.submissions.find_by_id(submission_id))
        .await?
        .ok_or(CoreError::NotFound("submission", submission_id.into_i64()))?;

    if submission.submitter_id != principal.id {
        return Err(CoreError::Forbidden(
            "only the submitter may resubmit a submission".to_string(),
        ));
    }

    if submission.status != SubmissionStatus::Rejected {
        return Err(CoreError::InvalidTransition {
            from: submission.status.as_str(),
            action: "resubmit",
        });
    }

    deps.store(deps.submissions.update_data(submission_id, &data))
        .await?
        .ok_or(CoreError::NotFound("submission", submission_id.into_i64()))?;

    // Losing this compare-and-set means a concurrent resubmit already moved
    // the record back to pending.
    let submission = deps
        .store(deps.submissions.transition_status(
            submission_id,
            SubmissionStatus::Rejected,
            SubmissionStatus::Pending,
        ))
        .await?
        .ok_or(CoreError::InvalidTransition {
            from: "pending",
            action: "resubmit",
        })?;

    let validation = deps
        .store(deps.validations.insert_shell(submission_id))
        .await?;

    let format = deps
        .store(deps.formats.find_by_id(submission.format_id))
        .await?
        .ok_or(CoreError::NotFound(
            "format",
            submission.format_id.into_i64(),
        ))?;

    let validators = deps.store(deps.directory.find_validators()).await?;
    let recipients: Vec<UserId> = validators.iter().map(|v| v.id).collect();
    let message = format!(
        "{} submitted by {} requires validation",
        format.title, principal.display_name
    );
    let delivered = notify_all(deps, &recipients, &message).await;

    info!(
        "Submission {} resubmitted by user {} ({}/{} validators notified)",
        submission_id,
        principal.id,
        delivered.len(),
        recipients.len()
    );

    Ok(SubmissionEvent::SubmissionResubmitted {
        submission,
        validation,
        notified: delivered.len(),
    })
}
