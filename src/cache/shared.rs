//! Shared Cache Module
//!
//! Thread-safe handle over a [`CacheStore`]: one reader-writer lock guards
//! both indexes together.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cache::{CacheStats, CacheStore, CachedResponse};

// == Shared Cache ==
/// Cloneable handle to a store shared between request workers.
///
/// Lookups and introspection take the read lock; every mutation takes the
/// write lock and runs to completion before releasing it. No call holds the
/// lock across an `.await`.
#[derive(Debug, Clone)]
pub struct SharedCache {
    inner: Arc<RwLock<CacheStore>>,
}

impl SharedCache {
    /// Creates a handle around a new store of the given capacity.
    pub fn new(max_entries: usize) -> Self {
        Self::from_store(CacheStore::new(max_entries))
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    // Store operations never panic while holding the lock, so a poisoned
    // lock still guards consistent indexes.
    fn read(&self) -> RwLockReadGuard<'_, CacheStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`CacheStore::get`].
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        self.read().get(key)
    }

    /// See [`CacheStore::try_insert`].
    pub fn try_insert(
        &self,
        key: impl Into<String>,
        tags: Vec<String>,
        response: CachedResponse,
        sticky: bool,
    ) -> bool {
        self.write().try_insert(key.into(), tags, response, sticky)
    }

    /// See [`CacheStore::force_insert`].
    pub fn force_insert(
        &self,
        key: impl Into<String>,
        tags: Vec<String>,
        response: CachedResponse,
        sticky: bool,
    ) {
        self.write().force_insert(key.into(), tags, response, sticky)
    }

    /// See [`CacheStore::evict`].
    pub fn evict(&self, key: &str) -> bool {
        self.write().evict(key)
    }

    /// See [`CacheStore::evict_by_tag`].
    pub fn evict_by_tag(&self, tag: &str) -> usize {
        self.write().evict_by_tag(tag)
    }

    /// See [`CacheStore::evict_all`].
    pub fn evict_all(&self) -> usize {
        self.write().evict_all()
    }

    pub fn stats(&self) -> CacheStats {
        self.read().stats()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.read().capacity()
    }

    pub fn tag_count(&self) -> usize {
        self.read().tag_count()
    }

    pub fn keys_for_tag(&self, tag: &str) -> Vec<String> {
        self.read().keys_for_tag(tag)
    }

    pub fn tags_for_key(&self, key: &str) -> Option<Vec<String>> {
        self.read().tags_for_key(key)
    }

    /// Runs `f` with shared access to the underlying store.
    pub fn with_store<R>(&self, f: impl FnOnce(&CacheStore) -> R) -> R {
        f(&self.read())
    }
}
