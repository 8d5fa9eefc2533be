//! Server shell - application wiring and the health endpoint.

pub mod app;
pub mod routes;

pub use app::{build_app, AppState};
