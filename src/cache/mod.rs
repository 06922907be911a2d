//! Cache Module
//!
//! Provides a bounded in-memory response cache with surrogate-tag
//! group invalidation.

mod entry;
mod shared;
mod stats;
mod store;
mod tags;


// Re-export public types
pub use entry::{CacheEntry, CachedResponse, ResponseHeaders};
pub use shared::SharedCache;
pub use stats::{CacheStats, StatsCounters};
pub use store::CacheStore;
pub use tags::TagIndex;
