//! Application setup and server configuration.
//!
//! HTTP routing proper is owned by the transport collaborator; the shell
//! here only wires shared state, the health endpoint and the standard
//! middleware stack.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Extension, routing::get, Router};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::health_handler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Build the axum application
pub fn build_app(db_pool: PgPool, deps: Arc<ServerDeps>) -> Router {
    let state = AppState { db_pool, deps };

    Router::new()
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
}
