//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /content/*path` - Cached demo content
//! - `DELETE /cache` - Evict every cached response
//! - `POST /cache/evict` - Evict one response by key
//! - `POST /cache/evict-by-tag` - Evict every response under a tag
//! - `GET /cache/tags?tag=...` - List the keys registered under a tag
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
