// Main entry point for API server

use anyhow::{Context, Result};
use server_core::kernel::{start_scheduler, PdfServiceClient, PgStore, ServerDeps};
use server_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Formline API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Wire dependencies: Postgres-backed stores + the PDF conversion service
    let store = Arc::new(PgStore::new(pool.clone()));
    let pdf = Arc::new(PdfServiceClient::new(config.pdf_service_url.clone()));
    let deps = Arc::new(ServerDeps::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        pdf,
    ));

    // Start scheduled tasks (notification retention sweep)
    let mut scheduler = start_scheduler(deps.clone())
        .await
        .context("Failed to start scheduler")?;

    // Build application
    let app = build_app(pool, deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("Server error")?;

    // Stop scheduled tasks before exit
    scheduler.shutdown().await.context("Scheduler shutdown failed")?;
    tracing::info!("Formline API stopped");

    Ok(())
}
