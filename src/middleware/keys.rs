//! Key and Tag Factories
//!
//! Derive the cache key and surrogate tags of a request.

use std::sync::Arc;

use axum::extract::Request;

/// Derives the cache key of a request.
pub type KeyFactory = Arc<dyn Fn(&Request) -> String + Send + Sync>;

/// Derives the surrogate tags of a request, in registration order.
pub type TagFactory = Arc<dyn Fn(&Request) -> Vec<String> + Send + Sync>;

/// Keys a request by its path and query string, e.g. `/content/a?page=2`.
pub fn path_and_query_key(request: &Request) -> String {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Tags a request with every prefix of its path.
///
/// `/content/a/b` yields `["content", "content/a", "content/a/b"]`, so purging
/// `content/a` invalidates everything cached below it.
pub fn path_prefix_tags(request: &Request) -> Vec<String> {
    let mut tags = Vec::new();
    let mut prefix = String::new();
    for segment in request.uri().path().split('/').filter(|s| !s.is_empty()) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        tags.push(prefix.clone());
    }
    tags
}
