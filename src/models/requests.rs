//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

/// Longest key or tag accepted by the admin API
pub const MAX_IDENTIFIER_LENGTH: usize = 1024;

/// Request body for evicting a single entry (POST /cache/evict)
#[derive(Debug, Clone, Deserialize)]
pub struct EvictRequest {
    /// Cache key, as derived by the key factory (e.g. `/content/a?page=2`)
    pub key: String,
}

impl EvictRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_identifier("Key", &self.key)
    }
}

/// Request body for evicting a group of entries (POST /cache/evict-by-tag)
#[derive(Debug, Clone, Deserialize)]
pub struct EvictByTagRequest {
    /// Surrogate tag (e.g. `content/a`)
    pub tag: String,
}

impl EvictByTagRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_identifier("Tag", &self.tag)
    }
}

/// Query string for listing the keys under a tag (GET /cache/tags?tag=...)
#[derive(Debug, Clone, Deserialize)]
pub struct TagQuery {
    /// Surrogate tag to inspect
    pub tag: String,
}

/// Query string of the demo content endpoint (GET /content/*path)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentQuery {
    /// Keep the rendered response out of capacity-driven eviction
    #[serde(default)]
    pub sticky: bool,
}

fn validate_identifier(kind: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{} cannot be empty", kind));
    }
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Some(format!(
            "{} exceeds maximum length of {} characters",
            kind, MAX_IDENTIFIER_LENGTH
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evict_request_deserialize() {
        let json = r#"{"key": "/content/a?page=2"}"#;
        let req: EvictRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "/content/a?page=2");
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_evict_by_tag_request_deserialize() {
        let json = r#"{"tag": "content/a"}"#;
        let req: EvictByTagRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.tag, "content/a");
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_empty() {
        let req = EvictRequest { key: "".to_string() };
        assert_eq!(req.validate().unwrap(), "Key cannot be empty");

        let req = EvictByTagRequest { tag: "".to_string() };
        assert_eq!(req.validate().unwrap(), "Tag cannot be empty");
    }

    #[test]
    fn test_validate_too_long() {
        let req = EvictByTagRequest {
            tag: "x".repeat(MAX_IDENTIFIER_LENGTH + 1),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_content_query_default() {
        let query = ContentQuery::default();
        assert!(!query.sticky);
    }
}
