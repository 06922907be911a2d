//! Cache Store Module
//!
//! Main cache engine: the primary index (key -> entry) kept in lockstep with
//! the tag index (tag -> keys), plus bounded capacity.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats, CachedResponse, TagIndex};

// == Cache Store ==
/// Bounded response store with surrogate-tag group invalidation.
///
/// Every key listed in a tag's registration has that tag in its entry's tag
/// list and vice versa. The only place both indexes change together is
/// [`CacheStore::remove_entry`] and the install path of the two inserts.
///
/// Not synchronized; see [`crate::cache::SharedCache`] for the locked wrapper.
#[derive(Debug)]
pub struct CacheStore {
    /// Primary index
    entries: HashMap<String, CacheEntry>,
    /// Tag -> keys reverse index
    tags: TagIndex,
    /// Activity counters
    stats: StatsCounters,
    /// Maximum number of resident entries
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: HashMap::with_capacity(max_entries.min(4096)),
            tags: TagIndex::new(),
            stats: StatsCounters::new(),
            max_entries,
        }
    }

    // == Get ==
    /// Returns a snapshot of the response stored under `key`.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.response.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Try Insert ==
    /// Inserts the entry only if `key` is not resident.
    ///
    /// Returns `false`, leaving the resident entry and its tag registrations
    /// untouched, when the key already exists.
    pub fn try_insert(
        &mut self,
        key: String,
        tags: Vec<String>,
        response: CachedResponse,
        sticky: bool,
    ) -> bool {
        if self.entries.contains_key(&key) {
            self.stats.record_duplicate_insert();
            return false;
        }

        self.install(key, CacheEntry::new(response, tags, sticky));
        true
    }

    // == Force Insert ==
    /// Installs the entry, replacing any resident entry under `key`.
    ///
    /// The previous entry is fully removed first, including its tag
    /// registrations, since its tag set may differ from the new one.
    pub fn force_insert(
        &mut self,
        key: String,
        tags: Vec<String>,
        response: CachedResponse,
        sticky: bool,
    ) {
        self.remove_entry(&key);
        self.install(key, CacheEntry::new(response, tags, sticky));
    }

    // == Evict ==
    /// Removes `key` and its tag registrations. Returns whether it was resident.
    pub fn evict(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
        }
        removed
    }

    // == Evict By Tag ==
    /// Removes every entry registered under `tag`, then the tag itself.
    ///
    /// Each removed entry is also dropped from all of its other tags.
    /// Returns the number of entries removed.
    pub fn evict_by_tag(&mut self, tag: &str) -> usize {
        let Some(keys) = self.tags.take(tag) else {
            return 0;
        };

        let mut removed = 0;
        for key in &keys {
            if self.remove_entry(key).is_some() {
                removed += 1;
            }
        }

        self.stats.record_invalidations(removed);
        debug!(tag, removed, "Evicted entries by tag");
        removed
    }

    // == Evict All ==
    /// Clears both indexes. Returns the number of entries removed.
    pub fn evict_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.tags.clear();
        self.stats.record_invalidations(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len(), self.tags.len())
    }

    // == Introspection ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Returns the number of live tag registrations.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Returns the keys registered under `tag`, sorted.
    pub fn keys_for_tag(&self, tag: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .tags
            .keys(tag)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Returns the tags of the entry under `key`, in registration order.
    pub fn tags_for_key(&self, key: &str) -> Option<Vec<String>> {
        self.entries.get(key).map(|entry| entry.tags.clone())
    }

    /// Returns true if the entry under `key` is sticky.
    pub fn is_sticky(&self, key: &str) -> Option<bool> {
        self.entries.get(key).map(|entry| entry.sticky)
    }

    pub(crate) fn entries(&self) -> &HashMap<String, CacheEntry> {
        &self.entries
    }

    pub(crate) fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    // == Internal ==

    /// Makes room if needed, then adds `entry` to both indexes.
    fn install(&mut self, key: String, entry: CacheEntry) {
        if self.entries.len() >= self.max_entries {
            self.make_room();
        }

        self.tags.register(&key, &entry.tags);
        self.entries.insert(key, entry);
        self.stats.record_insert();
    }

    /// Removes `key` from the primary index and from every tag it was
    /// registered under.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.tags.unregister(key, &entry.tags);
        Some(entry)
    }

    /// Evicts exactly one entry, preferring a non-sticky one.
    ///
    /// Which entry is chosen follows map iteration order and is otherwise
    /// unspecified.
    fn make_room(&mut self) {
        let victim = self
            .entries
            .iter()
            .find(|(_, entry)| !entry.sticky)
            .map(|(key, _)| key.clone());

        let victim = match victim {
            Some(key) => key,
            None => match self.entries.keys().next() {
                Some(key) => {
                    warn!(
                        key = %key,
                        capacity = self.max_entries,
                        "No non-sticky entry to evict, evicting a sticky one"
                    );
                    key.clone()
                }
                None => return,
            },
        };

        if self.remove_entry(&victim).is_some() {
            self.stats.record_capacity_eviction();
            debug!(key = %victim, "Evicted entry to make room");
        }
    }
}
