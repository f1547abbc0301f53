//! Router assembly for the dsaviz HTTP API.
//!
//! [`build_router`] wires the handlers to their routes with CORS and tracing
//! middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the axum router.
///
/// CORS is permissive since the visualizer front end may be served from a
/// different origin. TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze::analyze))
        // Legacy path used by the web front end.
        .route("/api/analyze-algorithm", post(handlers::analyze::analyze))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
