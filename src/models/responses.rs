//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the purge operations
/// (DELETE /cache, POST /cache/evict, POST /cache/evict-by-tag)
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// Human-readable summary
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl PurgeResponse {
    /// Summary of a full clear
    pub fn all(removed: usize) -> Self {
        Self {
            message: format!("Evicted all {} entries", removed),
            removed,
        }
    }

    /// Summary of a single-key eviction
    pub fn key(key: &str, removed: bool) -> Self {
        let message = if removed {
            format!("Key '{}' evicted", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self {
            message,
            removed: usize::from(removed),
        }
    }

    /// Summary of a group eviction
    pub fn tag(tag: &str, removed: usize) -> Self {
        Self {
            message: format!("Evicted {} entries tagged '{}'", removed, tag),
            removed,
        }
    }
}

/// Response body listing the keys registered under a tag (GET /cache/tags)
#[derive(Debug, Clone, Serialize)]
pub struct TagKeysResponse {
    /// The inspected tag
    pub tag: String,
    /// Keys currently registered under it, sorted
    pub keys: Vec<String>,
}

impl TagKeysResponse {
    pub fn new(tag: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            keys,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Activity counters and residency figures
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: CacheStats, capacity: usize) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            stats,
            capacity,
            hit_rate,
        }
    }
}

/// Response body of the demo content endpoint (GET /content/*path)
#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    /// Requested path below /content
    pub path: String,
    /// Sequence number of the render that produced this body
    pub render: u64,
    /// Render time in RFC 3339 format
    pub rendered_at: String,
}

impl ContentResponse {
    /// Creates a freshly rendered body
    pub fn new(path: impl Into<String>, render: u64) -> Self {
        Self {
            path: path.into(),
            render,
            rendered_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
