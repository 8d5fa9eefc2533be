//! Submission query actions
//!
//! Read endpoints are filtered by the access policy: plain users see their
//! own records, validator/admin see everything.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::common::{
    Actor, Capability, CoreError, FormatId, Principal, SubmissionId, UserId, ValidationId,
};
use crate::domains::submissions::models::submission::Submission;
use crate::domains::submissions::models::validation::Validation;
use crate::kernel::ServerDeps;

/// One row of the validators' worklist: a pending submission joined with its
/// open validation shell, keyed by the real submission id.
#[derive(Debug, Clone, Serialize)]
pub struct PendingValidation {
    pub submission_id: SubmissionId,
    pub validation_id: ValidationId,
    pub format_id: FormatId,
    pub format_title: String,
    pub submitter_id: UserId,
    pub data: Map<String, Value>,
    pub submitted_at: DateTime<Utc>,
}

/// Fetch one submission: own records for anyone, any record with the
/// view-all capability.
pub async fn get_submission(
    deps: &ServerDeps,
    principal: &Principal,
    submission_id: SubmissionId,
) -> Result<Submission, CoreError> {
    let submission = deps
        .store(deps.submissions.find_by_id(submission_id))
        .await?
        .ok_or(CoreError::NotFound("submission", submission_id.into_i64()))?;

    if submission.submitter_id != principal.id {
        Actor::new(principal)
            .can(Capability::ViewAllSubmissions)
            .check()?;
    }
    Ok(submission)
}

/// The caller's own submissions, newest first.
pub async fn list_own_submissions(
    deps: &ServerDeps,
    principal: &Principal,
) -> Result<Vec<Submission>, CoreError> {
    deps.store(deps.submissions.find_by_submitter(principal.id))
        .await
}

/// Every submission, newest first. Validator/admin only.
pub async fn list_all_submissions(
    deps: &ServerDeps,
    principal: &Principal,
) -> Result<Vec<Submission>, CoreError> {
    Actor::new(principal)
        .can(Capability::ViewAllSubmissions)
        .check()?;
    deps.store(deps.submissions.find_all()).await
}

/// The validators' worklist: submissions whose *current* status is pending,
/// oldest first, independent of how many rejected→pending cycles they saw.
pub async fn list_pending_validations(
    deps: &ServerDeps,
    principal: &Principal,
) -> Result<Vec<PendingValidation>, CoreError> {
    Actor::new(principal)
        .can(Capability::ViewAllSubmissions)
        .check()?;

    let pending = deps.store(deps.submissions.find_pending()).await?;

    let mut worklist = Vec::with_capacity(pending.len());
    for submission in pending {
        let shell = deps
            .store(deps.validations.find_open_by_submission(submission.id))
            .await?
            .ok_or(CoreError::NotFound("validation", submission.id.into_i64()))?;
        let format = deps
            .store(deps.formats.find_by_id(submission.format_id))
            .await?
            .ok_or(CoreError::NotFound(
                "format",
                submission.format_id.into_i64(),
            ))?;
        worklist.push(PendingValidation {
            submission_id: submission.id,
            validation_id: shell.id,
            format_id: format.id,
            format_title: format.title,
            submitter_id: submission.submitter_id,
            data: submission.data,
            submitted_at: submission.created_at,
        });
    }
    Ok(worklist)
}

/// Validation history for a submission, oldest cycle first: own records for
/// the submitter, any record with the view-all capability.
pub async fn get_validation_history(
    deps: &ServerDeps,
    principal: &Principal,
    submission_id: SubmissionId,
) -> Result<Vec<Validation>, CoreError> {
    let submission = deps
        .store(deps.submissions.find_by_id(submission_id))
        .await?
        .ok_or(CoreError::NotFound("submission", submission_id.into_i64()))?;

    if submission.submitter_id != principal.id {
        Actor::new(principal)
            .can(Capability::ViewAllSubmissions)
            .check()?;
    }

    deps.store(deps.validations.find_by_submission(submission_id))
        .await
}
