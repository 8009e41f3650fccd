// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::dashboard_service::DashboardService;
use crate::application::relay_service::RelayService;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_backend::HttpBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "air_quality_dashboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create backend adapter (infrastructure layer)
    let backend = Arc::new(HttpBackend::new(config.backend.clone())?);

    // Create services (application layer)
    let relay_service = RelayService::new(backend);
    let dashboard_service =
        DashboardService::new(relay_service.clone(), config.dashboard.refresh_delay());

    let state = Arc::new(AppState {
        relay_service,
        dashboard_service,
    });

    // Build router (presentation layer)
    let router = build_router(state, config.dashboard.max_upload_bytes());

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!(
        addr = %config.server.bind,
        backend = %config.backend.base_url,
        "Starting air-quality dashboard"
    );

    axum::serve(listener, router).await?;

    Ok(())
}
