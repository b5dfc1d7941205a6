//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, service wiring and the Axum server
//! lifecycle.

use crate::application::services::{AuthService, IdentityProvider, LinkAllocator, UserService};
use crate::config::Config;
use crate::domain::repositories::{MappingRepository, UserRepository};
use crate::infrastructure::persistence::{
    PgMappingRepository, PgTokenRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool using the configured limits and timeouts.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds the shared state over PostgreSQL-backed repositories.
pub fn build_state(pool: Arc<PgPool>, config: &Config) -> AppState {
    let mapping_repository: Arc<dyn MappingRepository> =
        Arc::new(PgMappingRepository::new(pool.clone()));
    let user_repository: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let token_repository = Arc::new(PgTokenRepository::new(pool));

    let allocator = Arc::new(LinkAllocator::new(
        mapping_repository,
        config.allocator_config(),
    ));
    let identity_provider: Arc<dyn IdentityProvider> = Arc::new(AuthService::new(
        token_repository,
        config.token_signing_secret.clone(),
    ));

    let users = Arc::new(UserService::new(user_repository));

    AppState::new(
        allocator,
        users,
        identity_provider,
        config.short_base_url.clone(),
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Allocator, user and authentication services
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let state = build_state(Arc::new(pool), &config);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
