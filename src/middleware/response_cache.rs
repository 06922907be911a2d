//! Response Cache Middleware
//!
//! Serves repeated requests from the cache and captures fresh responses
//! into it.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::flusher::CacheFlusher;
use super::keys::{KeyFactory, TagFactory};
use crate::cache::{CachedResponse, ResponseHeaders, SharedCache};
use crate::error::CacheError;
use crate::tasks::{spawn_insert, PendingInsert};

/// Response extension marking the response as sticky.
///
/// Handlers insert it to keep their response out of capacity-driven eviction:
/// `response.extensions_mut().insert(Sticky)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sticky;

// == Response Cache ==
/// Request-caching middleware state.
///
/// Install with
/// `axum::middleware::from_fn_with_state(response_cache, cache_responses)`.
#[derive(Clone)]
pub struct ResponseCache {
    cache: SharedCache,
    key_factory: KeyFactory,
    tag_factory: Option<TagFactory>,
    success_only: bool,
}

impl ResponseCache {
    /// Creates a middleware caching into `cache`, keyed by `key_factory`.
    ///
    /// Only 200 responses are cached until changed with [`Self::success_only`].
    pub fn new(cache: SharedCache, key_factory: KeyFactory) -> Self {
        Self {
            cache,
            key_factory,
            tag_factory: None,
            success_only: true,
        }
    }

    /// Tags every cached response with the output of `tag_factory`.
    pub fn with_tag_factory(mut self, tag_factory: TagFactory) -> Self {
        self.tag_factory = Some(tag_factory);
        self
    }

    /// When false, responses of any status are cached.
    pub fn success_only(mut self, success_only: bool) -> Self {
        self.success_only = success_only;
        self
    }

    /// The underlying store.
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }
}

impl CacheFlusher for ResponseCache {
    fn evict_all(&self) -> usize {
        self.cache.evict_all()
    }

    fn evict(&self, key: &str) -> bool {
        self.cache.evict(key)
    }

    fn evict_by_tag(&self, tag: &str) -> usize {
        self.cache.evict_by_tag(tag)
    }
}

// == Middleware ==
/// Replays a cached response when one exists; otherwise calls through,
/// answers the client and stores the response in the background.
pub async fn cache_responses(
    State(layer): State<ResponseCache>,
    request: Request,
    next: Next,
) -> Response {
    let key = (layer.key_factory)(&request);
    if let Some(cached) = layer.cache.get(&key) {
        debug!(key = %key, "Serving cached response");
        return replay(cached);
    }

    let tags = layer
        .tag_factory
        .as_ref()
        .map(|factory| factory(&request))
        .unwrap_or_default();

    let response = next.run(request).await;
    if layer.success_only && response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let body = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(key = %key, error = %err, "Failed to buffer response body");
            return CacheError::Internal("Failed to read response body".to_string())
                .into_response();
        }
    };

    let pending = PendingInsert {
        key,
        tags,
        response: CachedResponse::new(
            parts.status.as_u16(),
            body.clone(),
            capture_headers(&parts.headers),
        ),
        sticky: parts.extensions.get::<Sticky>().is_some(),
    };
    spawn_insert(layer.cache.clone(), pending);

    Response::from_parts(parts, Body::from(body))
}

/// Keeps the first value of every header except the wire-encoding ones.
fn capture_headers(headers: &HeaderMap) -> ResponseHeaders {
    headers
        .keys()
        .filter(|name| !is_wire_header(name))
        .filter_map(|name| {
            let value = headers.get(name)?.to_str().ok()?;
            Some((name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

/// Headers describing the wire encoding of one particular response.
fn is_wire_header(name: &HeaderName) -> bool {
    *name == header::CONTENT_LENGTH
        || *name == header::TRANSFER_ENCODING
        || *name == header::CONNECTION
}

fn replay(cached: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(cached.body));
    *response.status_mut() = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::OK);

    let headers = response.headers_mut();
    for (name, value) in &cached.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "Skipping unreplayable cached header"),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::keys::{path_and_query_key, path_prefix_tags};
    use axum::{extract::Path, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn layer(cache: SharedCache) -> ResponseCache {
        ResponseCache::new(cache, Arc::new(path_and_query_key))
            .with_tag_factory(Arc::new(path_prefix_tags))
    }

    fn app(layer: ResponseCache, calls: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/items/:id",
                get(move |Path(id): Path<String>| {
                    let calls = calls.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                        let mut response =
                            ([("x-render", n.to_string())], format!("item {} render {}", id, n))
                                .into_response();
                        if id == "missing" {
                            *response.status_mut() = StatusCode::NOT_FOUND;
                        }
                        if id == "pinned" {
                            response.extensions_mut().insert(Sticky);
                        }
                        response
                    }
                }),
            )
            .layer(axum::middleware::from_fn_with_state(layer, cache_responses))
    }

    async fn call(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn wait_until_cached(cache: &SharedCache, key: &str) {
        for _ in 0..200 {
            if cache.with_store(|store| store.contains_key(key)) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("key '{}' was never cached", key);
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let cache = SharedCache::new(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(layer(cache.clone()), calls.clone());

        let (status, _, first) = call(&app, "/items/1").await;
        assert_eq!(status, StatusCode::OK);
        wait_until_cached(&cache, "/items/1").await;

        let (status, headers, second) = call(&app, "/items/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, second);
        assert_eq!(headers["x-render"], "1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.tags_for_key("/items/1").unwrap(), vec!["items", "items/1"]);
    }

    #[tokio::test]
    async fn test_wire_headers_not_captured() {
        let cache = SharedCache::new(10);
        let app = app(layer(cache.clone()), Arc::new(AtomicUsize::new(0)));

        call(&app, "/items/1").await;
        wait_until_cached(&cache, "/items/1").await;

        let cached = cache.get("/items/1").unwrap();
        assert!(!cached.headers.contains_key("content-length"));
        assert_eq!(cached.headers["x-render"], "1");
        assert!(cached.headers.contains_key("content-type"));
    }

    #[tokio::test]
    async fn test_evict_by_tag_forces_rerender() {
        let cache = SharedCache::new(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let layer = layer(cache.clone());
        let app = app(layer.clone(), calls.clone());

        call(&app, "/items/1").await;
        call(&app, "/items/2").await;
        wait_until_cached(&cache, "/items/1").await;
        wait_until_cached(&cache, "/items/2").await;

        assert_eq!(layer.evict_by_tag("items/1"), 1);
        assert!(cache.get("/items/2").is_some());

        let (_, headers, _) = call(&app, "/items/1").await;
        assert_eq!(headers["x-render"], "3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_success_not_cached_by_default() {
        let cache = SharedCache::new(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(layer(cache.clone()), calls.clone());

        let (status, _, _) = call(&app, "/items/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        call(&app, "/items/missing").await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_cached_when_allowed() {
        let cache = SharedCache::new(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(layer(cache.clone()).success_only(false), calls.clone());

        call(&app, "/items/missing").await;
        wait_until_cached(&cache, "/items/missing").await;

        let (status, _, _) = call(&app, "/items/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sticky_marker_survives_capacity_pressure() {
        let cache = SharedCache::new(2);
        let app = app(layer(cache.clone()), Arc::new(AtomicUsize::new(0)));

        call(&app, "/items/pinned").await;
        wait_until_cached(&cache, "/items/pinned").await;
        for id in 0..5 {
            let uri = format!("/items/{}", id);
            call(&app, &uri).await;
            wait_until_cached(&cache, &uri).await;
        }

        assert_eq!(cache.len(), 2);
        assert!(cache.with_store(|store| store.is_sticky("/items/pinned") == Some(true)));
    }

    #[test]
    fn test_replay_restores_status_and_headers() {
        let mut headers = ResponseHeaders::new();
        headers.insert("x-custom".to_string(), "yes".to_string());
        headers.insert("bad header".to_string(), "ignored".to_string());

        let response = replay(CachedResponse::new(201, "body", headers));

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-custom"], "yes");
        assert!(response.headers().get("bad header").is_none());
    }
}
