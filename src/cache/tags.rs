//! Tag Index Module
//!
//! Maps each surrogate tag to the set of keys currently registered under it.

use std::collections::{HashMap, HashSet};

// == Tag Index ==
/// Reverse index from tag to keys.
///
/// Registrations are created on first reference and dropped as soon as their
/// key set becomes empty, so an empty set is never observable.
#[derive(Debug, Default)]
pub struct TagIndex {
    /// Tag -> keys registered under it
    tags: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    // == Constructor ==
    /// Creates a new empty tag index.
    pub fn new() -> Self {
        Self {
            tags: HashMap::new(),
        }
    }

    // == Register ==
    /// Registers `key` under every tag in `tags`.
    pub fn register(&mut self, key: &str, tags: &[String]) {
        for tag in tags {
            self.tags
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
    }

    // == Unregister ==
    /// Removes `key` from every tag in `tags`.
    ///
    /// A registration whose only member is `key` is deleted outright. Tags
    /// without a registration are ignored.
    pub fn unregister(&mut self, key: &str, tags: &[String]) {
        for tag in tags {
            let Some(keys) = self.tags.get_mut(tag) else {
                continue;
            };
            if keys.len() == 1 && keys.contains(key) {
                self.tags.remove(tag);
                continue;
            }
            keys.remove(key);
        }
    }

    // == Take ==
    /// Removes the registration for `tag` and returns its keys.
    pub fn take(&mut self, tag: &str) -> Option<HashSet<String>> {
        self.tags.remove(tag)
    }

    // == Keys ==
    /// Returns the keys registered under `tag`, if any.
    pub fn keys(&self, tag: &str) -> Option<&HashSet<String>> {
        self.tags.get(tag)
    }

    // == Contains ==
    /// Checks whether `tag` has a registration.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Iterates over every registration.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &HashSet<String>)> {
        self.tags.iter()
    }

    // == Clear ==
    /// Drops every registration.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    // == Length ==
    /// Returns the number of live tag registrations.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
