//! API Routes
//!
//! Configures the Axum router with the cached content routes and the admin
//! endpoints.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    content_handler, evict_all_handler, evict_by_tag_handler, evict_handler, health_handler,
    stats_handler, tag_keys_handler, AppState,
};
use crate::middleware::cache_responses;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /content/*path` - Demo origin, served through the response cache
/// - `DELETE /cache` - Evict every cached response
/// - `POST /cache/evict` - Evict one response by key
/// - `POST /cache/evict-by-tag` - Evict every response under a tag
/// - `GET /cache/tags?tag=...` - List the keys registered under a tag
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Response cache: content routes only
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let content = Router::new()
        .route("/content/*path", get(content_handler))
        .route_layer(from_fn_with_state(
            state.responses.clone(),
            cache_responses,
        ));

    Router::new()
        .route("/cache", delete(evict_all_handler))
        .route("/cache/evict", post(evict_handler))
        .route("/cache/evict-by-tag", post(evict_by_tag_handler))
        .route("/cache/tags", get(tag_keys_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .merge(content)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
