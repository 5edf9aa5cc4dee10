//! Shared helpers for tool tests

use crate::mcp::tool_registry::ToolContext;
use std::sync::Arc;
use std::time::Duration;
use webscout_common::rate_limiter::MockRateLimiter;
use webscout_web::fetch::WebFetcher;
use webscout_web::search::duckduckgo::DuckDuckGoClient;
use webscout_web::{WebConfig, WebPipeline};

/// Create a tool context whose rate limiter allows every request
pub fn test_context() -> ToolContext {
    context_with_limiter(MockRateLimiter::new())
}

/// Create a tool context whose rate limiter denies every request
pub fn rate_limited_test_context(retry_after: Duration) -> ToolContext {
    context_with_limiter(MockRateLimiter::denying(retry_after))
}

fn context_with_limiter(limiter: MockRateLimiter) -> ToolContext {
    let config = WebConfig::default();
    let pipeline = WebPipeline::with_components(
        config.clone(),
        Arc::new(limiter),
        WebFetcher::new(config.clone()),
        DuckDuckGoClient::new(),
    );
    ToolContext::new(Arc::new(pipeline), config)
}
