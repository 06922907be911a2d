//! Middleware Module
//!
//! Request interception in front of the cache: key and tag derivation,
//! cached-response replay, background capture, and the flush surface.

mod flusher;
mod keys;
mod response_cache;

pub use flusher::CacheFlusher;
pub use keys::{path_and_query_key, path_prefix_tags, KeyFactory, TagFactory};
pub use response_cache::{cache_responses, ResponseCache, Sticky};
