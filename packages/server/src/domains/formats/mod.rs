//! Format domain - document templates with fill-in variables.

pub mod actions;
pub mod models;

pub use models::format::{Format, FormatStatus, NewFormat, VariableDef, VariableKind};
