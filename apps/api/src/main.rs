//! Inkpost API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod policy;
mod state;
#[cfg(test)]
mod test_support;

use inkpost_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_services::{
    ServiceRepositories, build_app_state, build_postgres_session_layer, connect_and_migrate,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = connect_and_migrate(&config.database_url).await?;

    if config.migrate_only {
        info!("migrations applied successfully");
        return Ok(());
    }

    let app_state = build_app_state(ServiceRepositories::postgres(&pool), &config);
    let seeded_roles = app_state.security_admin_service.seed_default_roles().await?;
    info!(roles = seeded_roles.len(), "default roles ready");

    let session_layer = build_postgres_session_layer(pool, config.cookie_secure).await?;
    let app = api_router::build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "inkpost-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
