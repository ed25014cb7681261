//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use courier_common::{AppConfig, AppError};
use courier_db::{
    create_pool, PgPhoneAssignmentRepository, PgReadStateRepository, PgTemplateRepository,
    PgUserRepository,
};
use courier_provider::ProviderClient;
use courier_service::ServiceContext;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = state.config().cors.clone();
    let router = create_router().merge(health_routes());
    let router = apply_middleware(router, &cors);
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = courier_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create provider client
    let provider = ProviderClient::new(&config.provider)
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    // Create repositories
    let read_state_repo = Arc::new(PgReadStateRepository::new(pool.clone()));
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let assignment_repo = Arc::new(PgPhoneAssignmentRepository::new(pool.clone()));
    let template_repo = Arc::new(PgTemplateRepository::new(pool.clone()));

    // Build service context
    let service_context = ServiceContext::new(
        pool,
        read_state_repo,
        user_repo,
        assignment_repo,
        template_repo,
        Arc::new(provider),
    );

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
