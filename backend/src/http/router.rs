//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for the browser frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/sessions/{session_id}/interactions",
            post(handlers::post_interaction),
        )
        .route(
            "/sessions/{session_id}/snapshot",
            get(handlers::get_snapshot).put(handlers::put_snapshot),
        )
        // Visualization endpoints
        .route("/sessions/{session_id}/histogram", get(handlers::get_histogram))
        .route("/sessions/{session_id}/points", get(handlers::get_points))
        // Articles
        .route(
            "/articles/{page_id}/preview",
            get(handlers::get_article_preview),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Snapshots of large collections come in as one body.
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
