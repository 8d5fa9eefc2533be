//! Format domain actions - business logic functions

mod manage_format;
mod queries;

pub use manage_format::{create_format, set_format_status, update_format};
pub use queries::{get_format, list_active_formats};
