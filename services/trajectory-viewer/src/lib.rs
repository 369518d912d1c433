//! Trajectory Viewer
//!
//! Dashboards for HYSPLIT trajectories: run the model from a form, or upload
//! an existing trajectory dump, and see the result on a map. The same parse
//! and presentation pipeline backs the command-line subcommands.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod pipeline;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::state::AppState;

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Dashboards
        .route("/", get(handlers::dashboard::generator_handler))
        .route("/viewer", get(handlers::dashboard::viewer_handler))
        // API
        .route("/api/run", post(handlers::api::run_handler))
        .route("/api/tdump", post(handlers::api::tdump_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server.
pub async fn start_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr: SocketAddr = state.config.listen.parse()?;
    let app = build_router(state);

    info!(%addr, "Trajectory viewer listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
