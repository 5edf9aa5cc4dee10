//! Configuration for web scraping and search
//!
//! All settings can be overridden through `WEBSCOUT_`-prefixed environment
//! variables. Values that fail to parse fall back to their defaults with a
//! warning rather than aborting startup.

use crate::security::SecurityPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 15.0;

/// Default maximum length of extracted text in characters
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 15_000;

/// Default cap on raw response bytes read from upstream
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default minimum interval between requests per client key in seconds
pub const DEFAULT_RATE_LIMIT_SECS: f64 = 1.0;

/// Default number of redirect hops followed before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default User-Agent header sent with outbound requests
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for web scraping and search operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Enable debug logging
    pub debug: bool,
    /// Timeout for each upstream HTTP request
    pub request_timeout: Duration,
    /// Maximum length of extracted text in characters
    pub max_content_length: usize,
    /// Maximum raw response bytes read from upstream
    pub max_body_bytes: usize,
    /// Default number of search results when the request does not specify one
    pub default_search_results: usize,
    /// Minimum interval between requests per client key
    pub min_request_interval: Duration,
    /// User-Agent header for outbound requests
    pub user_agent: String,
    /// Maximum redirect hops followed per fetch
    pub max_redirects: usize,
    /// URL schemes accepted for fetching
    pub allowed_schemes: Vec<String>,
    /// Host names rejected before DNS resolution
    pub blocked_hosts: Vec<String>,
    /// Content types accepted for extraction
    pub allowed_content_types: Vec<String>,
    /// Skip IP range checks (development only, keeps blocked-host checks)
    pub allow_private_addresses: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            debug: false,
            request_timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            default_search_results: crate::types::DEFAULT_SEARCH_RESULTS,
            min_request_interval: Duration::from_secs_f64(DEFAULT_RATE_LIMIT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
            blocked_hosts: vec!["localhost".to_string(), "0.0.0.0".to_string()],
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            allow_private_addresses: false,
        }
    }
}

impl WebConfig {
    /// Load configuration from `WEBSCOUT_`-prefixed environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            debug: env_bool("WEBSCOUT_DEBUG", defaults.debug),
            request_timeout: Duration::from_secs_f64(env_f64(
                "WEBSCOUT_REQUEST_TIMEOUT",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            max_content_length: env_usize(
                "WEBSCOUT_MAX_CONTENT_LENGTH",
                defaults.max_content_length,
            ),
            max_body_bytes: env_usize("WEBSCOUT_MAX_BODY_BYTES", defaults.max_body_bytes),
            default_search_results: env_usize(
                "WEBSCOUT_SEARCH_RESULTS",
                defaults.default_search_results,
            )
            .clamp(
                crate::types::MIN_SEARCH_RESULTS,
                crate::types::MAX_SEARCH_RESULTS,
            ),
            min_request_interval: Duration::from_secs_f64(env_f64(
                "WEBSCOUT_RATE_LIMIT_SECONDS",
                DEFAULT_RATE_LIMIT_SECS,
            )),
            user_agent: std::env::var("WEBSCOUT_USER_AGENT")
                .unwrap_or_else(|_| defaults.user_agent.clone()),
            max_redirects: env_usize("WEBSCOUT_MAX_REDIRECTS", defaults.max_redirects),
            allow_private_addresses: env_bool(
                "WEBSCOUT_ALLOW_PRIVATE_ADDRESSES",
                defaults.allow_private_addresses,
            ),
            ..defaults
        }
    }

    /// Derive the security policy for URL validation from this configuration
    pub fn security_policy(&self) -> SecurityPolicy {
        SecurityPolicy {
            allowed_schemes: self.allowed_schemes.clone(),
            blocked_hosts: self.blocked_hosts.clone(),
            allow_private_addresses: self.allow_private_addresses,
            resolve_timeout: self.request_timeout,
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                tracing::warn!("Invalid boolean for {name}: '{other}', using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    match std::env::var(name) {
        Ok(value) => match value.trim().parse::<f64>() {
            Ok(parsed) if parsed > 0.0 => parsed,
            _ => {
                tracing::warn!("Invalid number for {name}: '{value}', using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(value) => match value.trim().parse::<usize>() {
            Ok(parsed) if parsed > 0 => parsed,
            _ => {
                tracing::warn!("Invalid integer for {name}: '{value}', using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}
