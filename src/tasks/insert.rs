//! Background Insert Task
//!
//! Offloads a try-insert of a captured response onto the runtime so the
//! client is answered without waiting for the cache write lock.

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::{CachedResponse, SharedCache};

/// A captured response waiting to be stored.
#[derive(Debug, Clone)]
pub struct PendingInsert {
    /// Cache key of the request
    pub key: String,
    /// Surrogate tags to register the entry under
    pub tags: Vec<String>,
    /// The captured response
    pub response: CachedResponse,
    /// Exempt the entry from capacity-driven eviction
    pub sticky: bool,
}

/// Spawns a task that try-inserts `pending` into `cache`.
///
/// The store call itself is synchronous; the returned handle resolves to
/// whether the entry was installed (`false` when another worker cached the
/// same key first).
///
/// # Example
/// ```ignore
/// let handle = spawn_insert(cache.clone(), pending);
/// let inserted = handle.await?;
/// ```
pub fn spawn_insert(cache: SharedCache, pending: PendingInsert) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let PendingInsert {
            key,
            tags,
            response,
            sticky,
        } = pending;

        let inserted = cache.try_insert(key.clone(), tags, response, sticky);
        if inserted {
            debug!(key = %key, sticky, "Cached response");
        } else {
            debug!(key = %key, "Response already cached, insert skipped");
        }
        inserted
    })
}
