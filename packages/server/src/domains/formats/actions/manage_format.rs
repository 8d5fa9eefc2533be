//! Format management actions - creator/admin operations on templates.

use tracing::info;

use crate::common::{Actor, Capability, CoreError, FormatId, Principal};
use crate::domains::formats::models::format::{Format, FormatChanges, FormatStatus, NewFormat};
use crate::kernel::ServerDeps;

/// Create a format template. New formats are active immediately.
pub async fn create_format(
    deps: &ServerDeps,
    principal: &Principal,
    new: NewFormat,
) -> Result<Format, CoreError> {
    Actor::new(principal).can(Capability::ManageFormats).check()?;

    if new.title.trim().is_empty() {
        return Err(CoreError::Validation("format title must not be empty".to_string()));
    }
    if new.body_template.trim().is_empty() {
        return Err(CoreError::Validation(
            "format body template must not be empty".to_string(),
        ));
    }

    let format = deps.store(deps.formats.insert(&new)).await?;
    info!("Format {} '{}' created by user {}", format.id, format.title, principal.id);
    Ok(format)
}

/// Edit a format template.
///
/// A format referenced by any submission is immutable (there is no template
/// versioning); deactivate it and create a new one instead.
pub async fn update_format(
    deps: &ServerDeps,
    principal: &Principal,
    format_id: FormatId,
    changes: FormatChanges,
) -> Result<Format, CoreError> {
    Actor::new(principal).can(Capability::ManageFormats).check()?;

    if deps.store(deps.formats.is_referenced(format_id)).await? {
        return Err(CoreError::Validation(
            "format is referenced by submissions and can no longer be edited".to_string(),
        ));
    }

    deps.store(deps.formats.update(format_id, &changes))
        .await?
        .ok_or(CoreError::NotFound("format", format_id.into_i64()))
}

/// Activate or deactivate a format. Deactivation stops new submissions but
/// leaves existing ones untouched.
pub async fn set_format_status(
    deps: &ServerDeps,
    principal: &Principal,
    format_id: FormatId,
    status: FormatStatus,
) -> Result<Format, CoreError> {
    Actor::new(principal).can(Capability::ManageFormats).check()?;

    let format = deps
        .store(deps.formats.set_status(format_id, status))
        .await?
        .ok_or(CoreError::NotFound("format", format_id.into_i64()))?;
    info!("Format {} set to {}", format.id, format.status);
    Ok(format)
}
