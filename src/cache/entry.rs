//! Cache Entry Module
//!
//! Defines the cached response payload and the entry record that wraps it
//! with its surrogate tags and stickiness flag.

use std::collections::HashMap;

use bytes::Bytes;

/// Header name -> header value, one value per name.
pub type ResponseHeaders = HashMap<String, String>;

// == Cached Response ==
/// The part of an entry that is replayed to clients: status, body and headers.
///
/// `body` is a reference-counted immutable buffer, so handing a snapshot out
/// of the store never aliases a buffer a caller could still mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
    /// Response headers captured at insert time
    pub headers: ResponseHeaders,
}

impl CachedResponse {
    /// Creates a new cached response.
    pub fn new(status: u16, body: impl Into<Bytes>, headers: ResponseHeaders) -> Self {
        Self {
            status,
            body: body.into(),
            headers,
        }
    }
}

// == Cache Entry ==
/// A resident entry of the primary index.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response
    pub response: CachedResponse,
    /// Tags this entry is registered under, in insertion order, no duplicates
    pub tags: Vec<String>,
    /// Sticky entries are skipped by capacity-driven eviction
    pub sticky: bool,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry.
    ///
    /// Repeated tags are collapsed to their first occurrence so that the tag
    /// list and the tag index stay in one-to-one correspondence.
    pub fn new(response: CachedResponse, tags: Vec<String>, sticky: bool) -> Self {
        Self {
            response,
            tags: dedup_preserving_order(tags),
            sticky,
        }
    }

    /// Returns true if the entry is registered under `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn dedup_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> CachedResponse {
        let mut headers = ResponseHeaders::new();
        headers.insert("h1".to_string(), "v1".to_string());
        CachedResponse::new(200, &b"{\"prop1\": \"val1\"}"[..], headers)
    }

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(
            response(),
            vec!["s1".to_string(), "s2".to_string()],
            false,
        );

        assert_eq!(entry.response.status, 200);
        assert_eq!(&entry.response.body[..], b"{\"prop1\": \"val1\"}");
        assert_eq!(entry.response.headers.get("h1").map(String::as_str), Some("v1"));
        assert_eq!(entry.tags, vec!["s1", "s2"]);
        assert!(!entry.sticky);
    }

    #[test]
    fn test_entry_without_tags() {
        let entry = CacheEntry::new(response(), Vec::new(), true);

        assert!(entry.tags.is_empty());
        assert!(entry.sticky);
        assert!(!entry.has_tag("s1"));
    }

    #[test]
    fn test_duplicate_tags_collapsed() {
        let tags = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        let entry = CacheEntry::new(response(), tags, false);

        assert_eq!(entry.tags, vec!["b", "a", "c"]);
        assert!(entry.has_tag("c"));
    }

    #[test]
    fn test_response_clone_shares_body() {
        let original = response();
        let copy = original.clone();

        assert_eq!(original, copy);
        assert_eq!(original.body.as_ptr(), copy.body.as_ptr());
    }
}
