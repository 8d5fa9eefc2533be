/// Access policy for Formline
///
/// Role-based branching lives in a single `capabilities_for(role)` table
/// plus a fluent guard called at every lifecycle entry point:
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, Capability};
///
/// Actor::new(&principal)
///     .can(Capability::DecideSubmission)
///     .check()?;
/// ```
///
/// This keeps authorization in the action layer where it belongs, not in
/// the transport layer.
mod builder;
mod capability;
mod principal;

pub use builder::{Actor, CapabilityCheck};
pub use capability::{capabilities_for, Capability, Role};
pub use principal::Principal;
