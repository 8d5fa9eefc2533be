use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::{CoreError, FormatId};

/// Kind of a fill-in variable in a format template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Text,
    Number,
    Date,
}

/// One named fill-in variable declared by a format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableKind,
    pub required: bool,
}

/// Publication status of a format.
///
/// Only active formats accept new submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStatus {
    Active,
    Inactive,
}

impl FormatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatStatus::Active => "active",
            FormatStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for FormatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(FormatStatus::Active),
            "inactive" => Ok(FormatStatus::Inactive),
            other => Err(format!("unknown format status: {other}")),
        }
    }
}

/// Format model - a document template with placeholder variables.
///
/// Immutable once referenced by a submission (no template versioning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Format {
    pub id: FormatId,
    pub title: String,
    pub body_template: String,
    pub variable_defs: Vec<VariableDef>,
    pub status: FormatStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a format.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFormat {
    pub title: String,
    pub body_template: String,
    pub variable_defs: Vec<VariableDef>,
}

/// Fields accepted when editing a format. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatChanges {
    pub title: Option<String>,
    pub body_template: Option<String>,
    pub variable_defs: Option<Vec<VariableDef>>,
}

#[derive(sqlx::FromRow)]
struct FormatRow {
    id: i64,
    title: String,
    body_template: String,
    variable_defs: serde_json::Value,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FormatRow> for Format {
    type Error = CoreError;

    fn try_from(row: FormatRow) -> Result<Self, Self::Error> {
        Ok(Format {
            id: FormatId::from_i64(row.id),
            title: row.title,
            body_template: row.body_template,
            variable_defs: serde_json::from_value(row.variable_defs)
                .map_err(|e| CoreError::Storage(format!("bad variable_defs json: {e}")))?,
            status: row.status.parse().map_err(CoreError::Storage)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Format {
    /// Find format by id
    pub async fn find_by_id(id: FormatId, pool: &PgPool) -> Result<Option<Self>, CoreError> {
        let row = sqlx::query_as::<_, FormatRow>("SELECT * FROM formats WHERE id = $1")
            .bind(id.into_i64())
            .fetch_optional(pool)
            .await?;
        row.map(Format::try_from).transpose()
    }

    /// Find all active formats, newest first
    pub async fn find_active(pool: &PgPool) -> Result<Vec<Self>, CoreError> {
        let rows = sqlx::query_as::<_, FormatRow>(
            "SELECT * FROM formats WHERE status = 'active' ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        rows.into_iter().map(Format::try_from).collect()
    }

    /// Insert a new format (always created active)
    pub async fn insert(new: &NewFormat, pool: &PgPool) -> Result<Self, CoreError> {
        let defs = serde_json::to_value(&new.variable_defs)
            .map_err(|e| CoreError::Storage(format!("encode variable_defs: {e}")))?;
        let row = sqlx::query_as::<_, FormatRow>(
            "INSERT INTO formats (title, body_template, variable_defs, status)
             VALUES ($1, $2, $3, 'active')
             RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.body_template)
        .bind(defs)
        .fetch_one(pool)
        .await?;
        row.try_into()
    }

    /// Apply edits to a format
    pub async fn update(
        id: FormatId,
        changes: &FormatChanges,
        pool: &PgPool,
    ) -> Result<Option<Self>, CoreError> {
        let defs = changes
            .variable_defs
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| CoreError::Storage(format!("encode variable_defs: {e}")))?;
        let row = sqlx::query_as::<_, FormatRow>(
            "UPDATE formats SET
                title = COALESCE($2, title),
                body_template = COALESCE($3, body_template),
                variable_defs = COALESCE($4, variable_defs),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id.into_i64())
        .bind(&changes.title)
        .bind(&changes.body_template)
        .bind(defs)
        .fetch_optional(pool)
        .await?;
        row.map(Format::try_from).transpose()
    }

    /// Activate or deactivate a format
    pub async fn set_status(
        id: FormatId,
        status: FormatStatus,
        pool: &PgPool,
    ) -> Result<Option<Self>, CoreError> {
        let row = sqlx::query_as::<_, FormatRow>(
            "UPDATE formats SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id.into_i64())
        .bind(status.as_str())
        .fetch_optional(pool)
        .await?;
        row.map(Format::try_from).transpose()
    }

    /// Whether any submission references this format (immutability guard)
    pub async fn is_referenced(id: FormatId, pool: &PgPool) -> Result<bool, CoreError> {
        let referenced: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM submissions WHERE format_id = $1)")
                .bind(id.into_i64())
                .fetch_one(pool)
                .await?;
        Ok(referenced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_defs_round_trip_json() {
        let defs = vec![
            VariableDef {
                name: "name".to_string(),
                kind: VariableKind::Text,
                required: true,
            },
            VariableDef {
                name: "days".to_string(),
                kind: VariableKind::Number,
                required: false,
            },
        ];
        let json = serde_json::to_value(&defs).unwrap();
        // The wire field is "type", matching stored data
        assert_eq!(json[0]["type"], "text");
        assert_eq!(json[1]["type"], "number");

        let back: Vec<VariableDef> = serde_json::from_value(json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].name, "name");
        assert!(back[0].required);
    }

    #[test]
    fn status_strings_are_stable() {
        assert_eq!(FormatStatus::Active.as_str(), "active");
        assert_eq!(FormatStatus::Inactive.as_str(), "inactive");
        assert_eq!("active".parse::<FormatStatus>().unwrap(), FormatStatus::Active);
        assert!("archived".parse::<FormatStatus>().is_err());
    }
}
