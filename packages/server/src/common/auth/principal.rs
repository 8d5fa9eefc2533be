use serde::{Deserialize, Serialize};

use super::Role;
use crate::common::UserId;

/// The authenticated actor performing an action.
///
/// Supplied by the auth collaborator; the core never issues or validates
/// credentials, it only consumes the id and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: UserId, display_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: email.into(),
            role,
        }
    }
}
