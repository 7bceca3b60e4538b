// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::query_service::QueryService;
use crate::application::session_store::SessionStore;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::table_service::TableService;
use crate::infrastructure::api_repository::ApiRepository;
use crate::infrastructure::config::load_config;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard, end_session, health_check, overview, query_history, query_suggestions,
    stream_dashboard, submit_query, table_view, update_table,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(ApiRepository::new(
        config.api.base_url.clone(),
        config.api.timeout_secs,
    )?);

    // Create services (application layer)
    let sessions = Arc::new(SessionStore::with_ttl(Duration::from_secs(
        config.session.ttl_secs,
    )));
    let dashboard_service = DashboardService::new(repository.clone());
    let streaming_service =
        StreamingDashboardService::new(dashboard_service.clone(), config.stream.channel_capacity);
    let query_service = QueryService::new(repository.clone(), sessions.clone());
    let table_service = TableService::new(repository.clone(), sessions.clone());

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        streaming_service,
        query_service,
        table_service,
        sessions,
    });

    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting commerce-dashboard on {} (analytics API {})",
        addr,
        config.api.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

/// Build router (presentation layer).
/// Compression is handled per response (and per chunk for the stream),
/// so no CompressionLayer here.
fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/overview", get(overview))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/queries/suggestions", get(query_suggestions))
        .route("/sessions/:id", delete(end_session))
        .route("/sessions/:id/queries", get(query_history).post(submit_query))
        .route("/sessions/:id/tables/:kind", get(table_view).patch(update_table))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
