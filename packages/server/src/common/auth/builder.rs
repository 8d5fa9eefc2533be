use super::{capabilities_for, Capability, Principal};
use crate::common::errors::CoreError;

/// Entry point for authorization checks
///
/// Usage:
/// ```rust,ignore
/// Actor::new(&principal)
///     .can(Capability::DecideSubmission)
///     .check()?;
/// ```
pub struct Actor<'a> {
    principal: &'a Principal,
}

impl<'a> Actor<'a> {
    /// Create a new actor for authorization checks
    pub fn new(principal: &'a Principal) -> Self {
        Self { principal }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityCheck<'a> {
        CapabilityCheck {
            principal: self.principal,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityCheck<'a> {
    principal: &'a Principal,
    capability: Capability,
}

impl CapabilityCheck<'_> {
    /// Perform the authorization check against the role table.
    ///
    /// Failing a check surfaces `Forbidden` naming the missing capability,
    /// never a silent no-op.
    pub fn check(self) -> Result<(), CoreError> {
        if capabilities_for(self.principal.role).contains(&self.capability) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "role '{}' may not {}",
                self.principal.role, self.capability
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::auth::Role;
    use crate::common::UserId;

    fn principal(role: Role) -> Principal {
        Principal::new(UserId::from_i64(1), "Test", "test@example.com", role)
    }

    #[test]
    fn admin_passes_every_check() {
        let admin = principal(Role::Admin);
        for cap in [
            Capability::CreateSubmission,
            Capability::EditSubmission,
            Capability::DecideSubmission,
            Capability::ViewAllSubmissions,
            Capability::ManageFormats,
        ] {
            assert!(Actor::new(&admin).can(cap).check().is_ok());
        }
    }

    #[test]
    fn user_decide_check_is_forbidden() {
        let user = principal(Role::User);
        let result = Actor::new(&user).can(Capability::DecideSubmission).check();
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }
}
