//! Format query actions

use crate::common::{CoreError, FormatId};
use crate::domains::formats::models::format::Format;
use crate::kernel::ServerDeps;

/// Formats currently accepting submissions, newest first.
pub async fn list_active_formats(deps: &ServerDeps) -> Result<Vec<Format>, CoreError> {
    deps.store(deps.formats.find_active()).await
}

/// Fetch one format by id.
pub async fn get_format(deps: &ServerDeps, format_id: FormatId) -> Result<Format, CoreError> {
    deps.store(deps.formats.find_by_id(format_id))
        .await?
        .ok_or(CoreError::NotFound("format", format_id.into_i64()))
}
