//! Edit submission action - data updates while the record is editable.

use serde_json::{Map, Value};
use tracing::debug;

use crate::common::{Actor, Capability, CoreError, Principal, SubmissionId};
use crate::domains::submissions::models::submission::{Submission, SubmissionStatus};
use crate::kernel::ServerDeps;

/// Replace the data of an editable submission.
///
/// Only the submitter may edit, and only while the submission is `pending`
/// or `rejected`; an approved record is immutable. Editing never changes the
/// status — resubmission is a separate action.
pub async fn edit_submission(
    deps: &ServerDeps,
    principal: &Principal,
    submission_id: SubmissionId,
    data: Map<String, Value>,
) -> Result<Submission, CoreError> {
    Actor::new(principal)
        .can(Capability::EditSubmission)
        .check()?;

    let submission = deps
        .store(deps.submissions.find_by_id(submission_id))
        .await?
        .ok_or(CoreError::NotFound("submission", submission_id.into_i64()))?;

    if submission.submitter_id != principal.id {
        return Err(CoreError::Forbidden(
            "only the submitter may edit a submission".to_string(),
        ));
    }

    if submission.status == SubmissionStatus::Approved {
        return Err(CoreError::InvalidTransition {
            from: submission.status.as_str(),
            action: "edit",
        });
    }

    let updated = deps
        .store(deps.submissions.update_data(submission_id, &data))
        .await?
        .ok_or(CoreError::NotFound("submission", submission_id.into_i64()))?;

    debug!("Submission {} data updated by user {}", submission_id, principal.id);
    Ok(updated)
}
