//! Notification domain - per-user notification records, polled by clients.
//!
//! Delivery is data-at-rest: the dispatcher creates records, clients poll
//! and mark them read, and a scheduled sweep garbage-collects read records
//! past retention.

pub mod actions;
pub mod models;

pub use models::notification::{Notification, NotificationStats};
