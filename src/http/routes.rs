use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, recordings_dir: impl AsRef<Path>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session pipeline
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:session_id", get(handlers::get_session))
        .route("/sessions/:session_id/audio", post(handlers::upload_audio))
        .route(
            "/sessions/:session_id/analyze",
            post(handlers::analyze_session),
        )
        // Dashboard queries
        .route(
            "/owners/:owner_id/analyses",
            get(handlers::list_owner_analyses),
        )
        .route("/owners/:owner_id/trends", get(handlers::get_owner_trends))
        // Stored recording playback
        .nest_service("/recordings", ServeDir::new(recordings_dir))
        // Browser dashboards are served from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
