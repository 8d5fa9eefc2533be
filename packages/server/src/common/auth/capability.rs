use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles in the Formline platform.
///
/// The string forms are the literals persisted by the auth collaborator and
/// must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fills in formats and tracks their own submissions.
    User,
    /// Authors and manages format templates.
    Creator,
    /// Reviews pending submissions and decides them.
    Validator,
    /// Full access to all operations.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Creator => "creator",
            Role::Validator => "validator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "creator" => Ok(Role::Creator),
            "validator" => Ok(Role::Validator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Capabilities gating the submission lifecycle and read endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create a submission against an active format.
    CreateSubmission,
    /// Edit own pending/rejected submissions (and resubmit).
    EditSubmission,
    /// Approve or reject pending submissions.
    DecideSubmission,
    /// Enumerate every submission/validation, not just one's own.
    ViewAllSubmissions,
    /// Create and manage format templates.
    ManageFormats,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::CreateSubmission => "create submissions",
            Capability::EditSubmission => "edit submissions",
            Capability::DecideSubmission => "decide submissions",
            Capability::ViewAllSubmissions => "view all submissions",
            Capability::ManageFormats => "manage formats",
        };
        f.write_str(name)
    }
}

/// Fixed role → capability table.
///
/// Admin is a superset of every other role. This is the single place role
/// branching happens; lifecycle entry points only ever consult this table.
pub fn capabilities_for(role: Role) -> &'static [Capability] {
    match role {
        Role::User => &[Capability::CreateSubmission, Capability::EditSubmission],
        Role::Creator => &[
            Capability::CreateSubmission,
            Capability::EditSubmission,
            Capability::ManageFormats,
        ],
        Role::Validator => &[
            Capability::CreateSubmission,
            Capability::EditSubmission,
            Capability::DecideSubmission,
            Capability::ViewAllSubmissions,
        ],
        Role::Admin => &[
            Capability::CreateSubmission,
            Capability::EditSubmission,
            Capability::DecideSubmission,
            Capability::ViewAllSubmissions,
            Capability::ManageFormats,
        ],
    }
}
