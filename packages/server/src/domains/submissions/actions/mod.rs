//! Submission lifecycle actions - the state machine's entry points
//!
//! Every action checks the caller's capability first, then its ownership and
//! status guards, then commits. Transition failures are typed so clients can
//! tell "already decided" from "you lack permission".

mod create_submission;
mod decide_submission;
mod edit_submission;
mod queries;
mod resubmit_submission;

pub use create_submission::create_submission;
pub use decide_submission::{decide_submission, Decision};
pub use edit_submission::edit_submission;
pub use queries::{
    get_submission, get_validation_history, list_all_submissions, list_own_submissions,
    list_pending_validations, PendingValidation,
};
pub use resubmit_submission::resubmit_submission;
