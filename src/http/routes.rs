use super::handlers;
use super::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Playback (GET) and publish (POST) share the stream namespace
        .route(
            "/stream/*path",
            get(handlers::play).post(handlers::publish),
        )
        // Session queries
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions/:session_id", get(handlers::get_session_status))
        // Publish bodies are unbounded live streams
        .layer(DefaultBodyLimit::disable())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
