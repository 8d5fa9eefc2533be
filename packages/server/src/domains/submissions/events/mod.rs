use serde::{Deserialize, Serialize};

use crate::domains::submissions::models::submission::Submission;
use crate::domains::submissions::models::validation::Validation;

/// Submission domain events - FACT EVENTS ONLY
///
/// Immutable facts about lifecycle transitions that committed. Errors go in
/// `Result::Err`, not in events. The notification fan-out has already run by
/// the time an event is returned; `notified` counts the recipients actually
/// reached (fan-out is best effort).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubmissionEvent {
    /// A submission entered the lifecycle in `pending`
    SubmissionCreated {
        submission: Submission,
        validation: Validation,
        notified: usize,
    },

    /// A validator decided a pending submission
    SubmissionDecided {
        submission: Submission,
        validation: Validation,
    },

    /// A rejected submission was edited and returned to `pending`
    SubmissionResubmitted {
        submission: Submission,
        validation: Validation,
        notified: usize,
    },
}
