//! End-to-end tests for the MCP tools against a local mock server
//!
//! The mock server binds to 127.0.0.1, so IP range checks are disabled
//! while the rest of the pipeline runs as in production.

use rmcp::model::{CallToolResult, RawContent};
use webscout_tools::McpServer;
use webscout_web::WebConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> WebConfig {
    WebConfig {
        allow_private_addresses: true,
        ..WebConfig::default()
    }
}

fn response_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}

#[tokio::test]
async fn test_scrape_url_tool_end_to_end() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><h1>Hello</h1><p>From the mock server.</p></body></html>",
            "text/html",
        ))
        .mount(&upstream)
        .await;

    let server = McpServer::new(test_config());
    let result = server
        .execute_tool(
            "scrape_url",
            serde_json::json!({ "url": format!("{}/page", upstream.uri()) }),
        )
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(false));
    let text = response_text(&result);
    assert!(text.starts_with("## Content from"));
    assert!(text.contains("Hello"));
    assert!(text.contains("From the mock server."));
}

#[tokio::test]
async fn test_scrape_url_tool_rate_limited_on_second_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body><p>ok</p></body></html>", "text/html"),
        )
        .mount(&upstream)
        .await;

    let server = McpServer::new(test_config());
    let url = format!("{}/page", upstream.uri());

    let first = server
        .execute_tool("scrape_url", serde_json::json!({ "url": url }))
        .await
        .unwrap();
    assert_eq!(first.is_error, Some(false));

    // Second call lands inside the minimum request interval
    let second = server
        .execute_tool("scrape_url", serde_json::json!({ "url": url }))
        .await
        .unwrap();
    assert_eq!(second.is_error, Some(true));

    let metadata: serde_json::Value = serde_json::from_str(response_text(&second)).unwrap();
    assert_eq!(metadata["error_type"], "too_many_requests");
    assert!(metadata["retry_after_ms"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_scrape_url_tool_unsupported_content_type() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"{\"a\":1}".to_vec(), "application/json"),
        )
        .mount(&upstream)
        .await;

    let server = McpServer::new(test_config());
    let result = server
        .execute_tool(
            "scrape_url",
            serde_json::json!({ "url": format!("{}/data", upstream.uri()) }),
        )
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let metadata: serde_json::Value = serde_json::from_str(response_text(&result)).unwrap();
    assert_eq!(metadata["error_type"], "unsupported_content_type");
}

#[tokio::test]
async fn test_scrape_url_tool_rejects_blocked_host() {
    let server = McpServer::new(test_config());
    let result = server
        .execute_tool(
            "scrape_url",
            serde_json::json!({ "url": "http://localhost/admin" }),
        )
        .await;

    // Validation failures surface as protocol errors, not tool results
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("localhost"));
}

#[tokio::test]
async fn test_list_tools_exposes_schemas() {
    let server = McpServer::new(test_config());
    let tools = server.list_tools().await;

    assert_eq!(tools.len(), 2);
    let scrape = tools.iter().find(|t| t.name == "scrape_url").unwrap();
    assert!(scrape.input_schema.contains_key("properties"));
    let search = tools.iter().find(|t| t.name == "web_search").unwrap();
    assert!(search.input_schema.contains_key("properties"));
}
