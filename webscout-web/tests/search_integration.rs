//! Integration tests for search against a mock DuckDuckGo endpoint

use std::sync::Arc;
use std::time::Duration;
use webscout_common::rate_limiter::MockRateLimiter;
use webscout_web::fetch::WebFetcher;
use webscout_web::pipeline::{WebError, WebPipeline};
use webscout_web::search::duckduckgo::{DuckDuckGoClient, DuckDuckGoConfig};
use webscout_web::types::SearchRequest;
use webscout_web::WebConfig;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_HTML: &str = r##"
<html><body>
  <div class="result web-result">
    <h2 class="result__title">
      <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2F&rut=x">The Rust Book</a>
    </h2>
    <a class="result__snippet" href="#">Learn Rust from first principles.</a>
  </div>
  <div class="result web-result">
    <h2 class="result__title">
      <a class="result__a" href="https://www.rust-lang.org/">Rust Language</a>
    </h2>
    <a class="result__snippet" href="#">A language empowering everyone.</a>
  </div>
</body></html>
"##;

async fn search_pipeline(server: &MockServer) -> WebPipeline {
    let config = WebConfig {
        allow_private_addresses: true,
        ..WebConfig::default()
    };
    let client = DuckDuckGoClient::with_config(DuckDuckGoConfig {
        endpoint: format!("{}/html/", server.uri()),
        timeout: Duration::from_secs(2),
        ..DuckDuckGoConfig::default()
    });
    WebPipeline::with_components(
        config.clone(),
        Arc::new(MockRateLimiter::new()),
        WebFetcher::new(config),
        client,
    )
}

#[tokio::test]
async fn test_search_returns_parsed_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("q=rust+book"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(RESULTS_HTML, "text/html"))
        .mount(&server)
        .await;

    let pipeline = search_pipeline(&server).await;
    let response = pipeline
        .search(&SearchRequest {
            query: "rust book".to_string(),
            max_results: Some(10),
        })
        .await
        .unwrap();

    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].title, "The Rust Book");
    assert_eq!(response.results[0].url, "https://doc.rust-lang.org/book/");
    assert_eq!(response.metadata.query, "rust book");
    assert_eq!(response.metadata.results_count, 2);

    let markdown = response.to_markdown();
    assert!(markdown.contains("## Search Results for: rust book"));
    assert!(markdown.contains("1. **The Rust Book**"));
}

#[tokio::test]
async fn test_search_clamps_result_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(RESULTS_HTML, "text/html"))
        .mount(&server)
        .await;

    let pipeline = search_pipeline(&server).await;
    // max_results of 1 keeps only the first result
    let response = pipeline
        .search(&SearchRequest {
            query: "rust".to_string(),
            max_results: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(response.results.len(), 1);

    // Out-of-range values clamp instead of failing
    let response = pipeline
        .search(&SearchRequest {
            query: "rust".to_string(),
            max_results: Some(1000),
        })
        .await
        .unwrap();
    assert_eq!(response.results.len(), 2);
}

#[tokio::test]
async fn test_search_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><body></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let pipeline = search_pipeline(&server).await;
    let response = pipeline
        .search(&SearchRequest {
            query: "obscure query".to_string(),
            max_results: None,
        })
        .await
        .unwrap();

    assert!(response.results.is_empty());
    assert!(response.to_markdown().contains("No results found."));
}

#[tokio::test]
async fn test_search_upstream_rate_limit_maps_to_429() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let pipeline = search_pipeline(&server).await;
    let err = pipeline
        .search(&SearchRequest {
            query: "rust".to_string(),
            max_results: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WebError::UpstreamError { status: 429 }));
}

#[tokio::test]
async fn test_search_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let pipeline = search_pipeline(&server).await;
    let err = pipeline
        .search(&SearchRequest {
            query: "rust".to_string(),
            max_results: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WebError::UpstreamError { status: 503 }));
}
