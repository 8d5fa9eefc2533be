use thiserror::Error;

/// Typed error taxonomy for the Formline core.
///
/// Every lifecycle failure names the guard that was violated so clients can
/// render an actionable message (e.g. "already decided by someone else" vs.
/// "you lack permission"). The core never swallows these; only the
/// notification fan-out aggregates per-recipient failures.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or rejected input (missing format, inactive format, empty title).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{0} {1} not found")]
    NotFound(&'static str, i64),

    /// The capability check failed for the calling principal.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The requested transition is not an edge of the lifecycle.
    #[error("Invalid transition: cannot {action} a {from} submission")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    /// Lost the race against a concurrent decision on the same submission.
    #[error("Submission was already decided by another validator")]
    AlreadyDecided,

    /// The external PDF renderer failed.
    #[error("Document rendering failed: {0}")]
    RenderFailure(String),

    /// An external call exceeded its deadline.
    #[error("Timed out waiting on {0}")]
    Timeout(&'static str),

    /// Storage collaborator fault.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CoreError::NotFound("record", 0),
            other => CoreError::Storage(other.to_string()),
        }
    }
}
