//! API Handlers
//!
//! HTTP request handlers for the admin endpoints and the demo origin.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::middleware::{
    path_and_query_key, path_prefix_tags, CacheFlusher, ResponseCache, Sticky,
};
use crate::models::{
    ContentQuery, ContentResponse, EvictByTagRequest, EvictRequest, HealthResponse,
    PurgeResponse, StatsResponse, TagKeysResponse, TagQuery,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: SharedCache,
    /// Response cache in front of the content routes
    pub responses: ResponseCache,
    /// Number of times the demo origin rendered a body
    pub renders: Arc<AtomicU64>,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    ///
    /// Content responses are keyed by path and query and tagged with every
    /// prefix of their path.
    pub fn new(cache: SharedCache, success_only: bool) -> Self {
        let responses = ResponseCache::new(cache.clone(), Arc::new(path_and_query_key))
            .with_tag_factory(Arc::new(path_prefix_tags))
            .success_only(success_only);
        Self {
            cache,
            responses,
            renders: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SharedCache::new(config.max_entries), config.success_only)
    }
}

/// Handler for DELETE /cache
///
/// Evicts every cached response.
pub async fn evict_all_handler(State(state): State<AppState>) -> Json<PurgeResponse> {
    let removed = state.responses.evict_all();
    info!(removed, "Evicted all cached responses");

    Json(PurgeResponse::all(removed))
}

/// Handler for POST /cache/evict
///
/// Evicts the response cached under one key. Unknown keys are not an error.
pub async fn evict_handler(
    State(state): State<AppState>,
    Json(req): Json<EvictRequest>,
) -> Result<Json<PurgeResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.responses.evict(&req.key);
    info!(key = %req.key, removed, "Evicted cached response by key");

    Ok(Json(PurgeResponse::key(&req.key, removed)))
}

/// Handler for POST /cache/evict-by-tag
///
/// Evicts every response registered under a surrogate tag.
pub async fn evict_by_tag_handler(
    State(state): State<AppState>,
    Json(req): Json<EvictByTagRequest>,
) -> Result<Json<PurgeResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.responses.evict_by_tag(&req.tag);
    info!(tag = %req.tag, removed, "Evicted cached responses by tag");

    Ok(Json(PurgeResponse::tag(&req.tag, removed)))
}

/// Handler for GET /cache/tags?tag=...
///
/// Lists the keys registered under a tag.
pub async fn tag_keys_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<TagKeysResponse>> {
    let keys = state.cache.keys_for_tag(&query.tag);
    if keys.is_empty() {
        return Err(CacheError::NotFound(format!("tag '{}'", query.tag)));
    }

    Ok(Json(TagKeysResponse::new(query.tag, keys)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (stats, capacity) = state
        .cache
        .with_store(|store| (store.stats(), store.capacity()));

    Json(StatsResponse::new(stats, capacity))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /content/*path
///
/// Demo origin behind the response cache: every call renders a new body.
/// `?sticky=true` marks the response sticky.
pub async fn content_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Response {
    let render = state.renders.fetch_add(1, Ordering::Relaxed) + 1;

    let mut response = Json(ContentResponse::new(path, render)).into_response();
    if query.sticky {
        response.extensions_mut().insert(Sticky);
    }
    response
}
