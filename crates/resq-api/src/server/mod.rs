//! Server setup and initialization
//!
//! Wires configuration into pools, repositories and services, then serves
//! the Axum application.

use std::sync::Arc;

use axum::Router;
use resq_cache::{RedisPool, RefreshTokenStore};
use resq_common::{AppConfig, AppError, JwtService};
use resq_db::{
    create_pool, run_migrations, PgAdminRepository, PgAlertChangeFeed, PgAlertRepository,
    PgIdentityRepository, PgUserRepository,
};
use resq_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_common_layers, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let is_production = config.app.env.is_production();

    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        is_production,
    );
    let health = apply_common_layers(health_routes(), &config.cors, is_production);

    health.merge(api).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let collection = config.alert_collection;
    info!(table = collection.table_name(), "Using alert collection");

    let alert_repo = Arc::new(PgAlertRepository::new(pool.clone(), collection));
    let change_feed = Arc::new(PgAlertChangeFeed::new(pool.clone(), collection));
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let identity_repo = Arc::new(PgIdentityRepository::new(pool.clone()));
    let admin_repo = Arc::new(PgAdminRepository::new(pool.clone()));
    let session_store = Arc::new(RefreshTokenStore::with_ttl(
        redis_pool.clone(),
        u64::try_from(config.jwt.refresh_token_expiry).unwrap_or(0),
    ));

    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .redis_pool(redis_pool)
        .alert_repo(alert_repo)
        .change_feed(change_feed)
        .user_repo(user_repo)
        .identity_repo(identity_repo)
        .admin_repo(admin_repo)
        .session_store(session_store)
        .jwt_service(jwt_service)
        .directory_config(config.directory.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve the application on a bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Failed to read listener address: {e}")))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let state = create_app_state(config).await?;
    let app = create_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    run_server(app, listener).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
