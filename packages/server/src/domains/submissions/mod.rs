//! Submission domain - the filled-format lifecycle and approval state machine.
//!
//! States: `pending` (initial) → `approved` | `rejected`; a rejected
//! submission may be edited and resubmitted back to `pending`, opening a new
//! validation cycle while the old one stays on record.

pub mod actions;
pub mod events;
pub mod models;

pub use events::SubmissionEvent;
pub use models::submission::{Submission, SubmissionStatus};
pub use models::validation::Validation;
