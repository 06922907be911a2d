//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

const DEFAULT_MAX_ENTRIES: usize = 1000;
const DEFAULT_SERVER_PORT: u16 = 3000;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of responses the cache can hold (always > 0)
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Only cache responses with status 200
    pub success_only: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000, zero is rejected)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SUCCESS_ONLY` - Cache only 200 responses (default: true)
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            success_only: env::var("SUCCESS_ONLY")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            server_port: DEFAULT_SERVER_PORT,
            success_only: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 3000);
        assert!(config.success_only);
    }

    // Single test touching the environment so parallel tests don't race.
    #[test]
    fn test_config_from_env() {
        env::remove_var("MAX_ENTRIES");
        env::remove_var("SERVER_PORT");
        env::remove_var("SUCCESS_ONLY");

        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 3000);
        assert!(config.success_only);

        env::set_var("MAX_ENTRIES", "0");
        env::set_var("SUCCESS_ONLY", "false");
        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert!(!config.success_only);

        env::set_var("MAX_ENTRIES", "25");
        env::set_var("SUCCESS_ONLY", "maybe");
        let config = Config::from_env();
        assert_eq!(config.max_entries, 25);
        assert!(config.success_only);

        env::remove_var("MAX_ENTRIES");
        env::remove_var("SUCCESS_ONLY");
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("nope"), None);
    }
}
