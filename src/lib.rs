//! Surrogate Cache - An in-memory HTTP response cache
//!
//! Caches rendered responses under a request key and lets whole groups of
//! them be purged at once through surrogate tags.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, CachedResponse, SharedCache};
pub use config::Config;
pub use middleware::{CacheFlusher, ResponseCache};
