//! # WebScout Common
//!
//! Foundational types, traits, and utilities shared across the WebScout
//! ecosystem. It serves as the base dependency for the other WebScout crates,
//! establishing common patterns and abstractions.
//!
//! ## Modules
//!
//! - [`error`] - Structured error types and the shared [`Result`] alias
//! - [`logging`] - Tracing subscriber setup
//! - [`rate_limiter`] - Per-client request pacing

pub mod error;
pub mod logging;
pub mod rate_limiter;

// Re-export error types for convenience
pub use error::{Result, WebScoutError};

// Re-export logging setup for convenience
pub use logging::init_tracing;

// Re-export rate limiting functionality for convenience
pub use rate_limiter::{
    MinIntervalLimiter, MockRateLimiter, RateLimitChecker, RateLimitError,
    DEFAULT_MAX_TRACKED_KEYS, DEFAULT_MIN_INTERVAL,
};
