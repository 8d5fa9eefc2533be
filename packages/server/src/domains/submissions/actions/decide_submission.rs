//! Decide submission action - the approval edge of the lifecycle.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::common::{Actor, Capability, CoreError, Principal, SubmissionId};
use crate::domains::notifications::actions::notify;
use crate::domains::submissions::events::SubmissionEvent;
use crate::domains::submissions::models::submission::SubmissionStatus;
use crate::kernel::ServerDeps;

/// A validator's verdict on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn status(self) -> SubmissionStatus {
        match self {
            Decision::Approved => SubmissionStatus::Approved,
            Decision::Rejected => SubmissionStatus::Rejected,
        }
    }
}

/// Decide a pending submission.
///
/// Requires the decide capability; self-approval is refused. Concurrent
/// decisions serialize on the status compare-and-set: the loser observes a
/// submission that was still pending at read time but terminal at commit
/// time, and fails with `AlreadyDecided` instead of silently overwriting.
pub async fn decide_submission(
    deps: &ServerDeps,
    principal: &Principal,
    submission_id: SubmissionId,
    decision: Decision,
    observations: Option<String>,
) -> Result<SubmissionEvent, CoreError> {
    Actor::new(principal)
        .can(Capability::DecideSubmission)
        .check()?;

    let submission = deps
        .store(deps.submissions.find_by_id(submission_id))
        .await?
        .ok_or(CoreError::NotFound("submission", submission_id.into_i64()))?;

    if submission.submitter_id == principal.id {
        return Err(CoreError::Forbidden(
            "validators may not decide their own submission".to_string(),
        ));
    }

    if submission.status != SubmissionStatus::Pending {
        return Err(CoreError::InvalidTransition {
            from: submission.status.as_str(),
            action: "decide",
        });
    }

    // The serialization point: whoever commits this conditional update first
    // wins; everyone else lost a race that was still open at read time.
    let submission = deps
        .store(deps.submissions.transition_status(
            submission_id,
            SubmissionStatus::Pending,
            decision.status(),
        ))
        .await?
        .ok_or(CoreError::AlreadyDecided)?;

    let shell = deps
        .store(deps.validations.find_open_by_submission(submission_id))
        .await?
        .ok_or(CoreError::NotFound("validation", submission_id.into_i64()))?;

    let validation = deps
        .store(deps.validations.finalize(
            shell.id,
            principal.id,
            decision.status(),
            observations.as_deref(),
        ))
        .await?
        .ok_or(CoreError::NotFound("validation", shell.id.into_i64()))?;

    info!(
        "Submission {} {} by validator {}",
        submission_id,
        submission.status,
        principal.id
    );

    // Submitter notification is best effort: the decision has committed, so
    // a notification fault is logged, not surfaced.
    let outcome = match decision {
        Decision::Approved => "approved",
        Decision::Rejected => "rejected",
    };
    if let Some(format) = deps
        .store(deps.formats.find_by_id(submission.format_id))
        .await
        .ok()
        .flatten()
    {
        let message = format!("Your submission '{}' was {}", format.title, outcome);
        if let Err(e) = notify(deps, submission.submitter_id, &message).await {
            error!(
                "Failed to notify submitter {} of decision: {}",
                submission.submitter_id, e
            );
        }
    }

    Ok(SubmissionEvent::SubmissionDecided {
        submission,
        validation,
    })
}
