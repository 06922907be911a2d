//! Cache Flusher
//!
//! The invalidation surface handed to application code that needs to purge
//! cached responses.

/// Evicts cached responses by key, by tag, or all at once.
pub trait CacheFlusher: Send + Sync {
    /// Drops every cached response. Returns how many were removed.
    fn evict_all(&self) -> usize;

    /// Drops the response cached under `key`. Returns whether one was resident.
    fn evict(&self, key: &str) -> bool;

    /// Drops every response tagged with `tag`. Returns how many were removed.
    fn evict_by_tag(&self, tag: &str) -> usize;
}
