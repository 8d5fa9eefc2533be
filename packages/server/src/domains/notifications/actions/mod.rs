//! Notification dispatcher actions - business logic functions

mod dispatch;
mod sweep;

pub use dispatch::{list_for, mark_read, notify, notify_all};
pub use sweep::{default_retention, stats, sweep};
