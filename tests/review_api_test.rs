//! /review 端点的端到端测试
//!
//! 通过 warp::test 驱动真实的过滤器树；AI 服务用本地 warp 模拟或确定性桩替代

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

use coderefine::ai::{Optimization, OptimizationGateway, OptimizationRequest, UnconfiguredGateway};
use coderefine::config::{AIConfig, AppConfig};
use coderefine::errors::AIError;
use coderefine::review::ReviewService;
use coderefine::server::routes;

struct StubGateway;

#[async_trait]
impl OptimizationGateway for StubGateway {
    async fn optimize(&self, request: OptimizationRequest<'_>) -> Result<Optimization, AIError> {
        Ok(Optimization {
            optimized_code: request.code.lines().next().unwrap_or_default().to_string(),
            explanation: format!("stub for {}", request.language),
            complexity_reduction: Some("50.0%".to_string()),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn model_info(&self) -> String {
        "stub".to_string()
    }
}

async fn post_review(service: ReviewService, body: Value) -> (StatusCode, Value) {
    let filter = routes(Arc::new(service));
    let resp = warp::test::request()
        .method("POST")
        .path("/review")
        .json(&body)
        .reply(&filter)
        .await;
    let status = resp.status();
    let value = serde_json::from_slice(resp.body()).expect("json body");
    (status, value)
}

fn unconfigured() -> ReviewService {
    ReviewService::new(100_000, Arc::new(UnconfiguredGateway))
}

#[tokio::test]
async fn test_empty_and_whitespace_code_is_400() {
    for code in ["", "  \n\t "] {
        let (status, body) = post_review(unconfigured(), json!({ "code": code })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Code cannot be empty");
    }
}

#[tokio::test]
async fn test_unconfigured_gateway_returns_original_code() {
    let code = "import os\nx = eval(input())\nprint(x)";
    let (status, body) = post_review(unconfigured(), json!({ "code": code })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detected_language"], "Python");
    assert_eq!(body["optimized_code"], code);
    assert_eq!(body["complexity_reduction"], "0.0%");
    assert_eq!(body["line_count"], 3);
    assert_eq!(body["complexity"], "Low");

    let explanation = body["explanation"].as_str().unwrap();
    assert!(explanation.starts_with("API key not configured"));
    for issue in body["issues"].as_array().unwrap() {
        let title = issue["title"].as_str().unwrap();
        assert!(explanation.contains(title), "{title} missing from explanation");
    }
    assert!(body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i["title"] == "Dangerous Function Usage" && i["severity"] == "critical"));
}

#[tokio::test]
async fn test_toggles_and_pinned_language() {
    let service = ReviewService::new(100_000, Arc::new(StubGateway));
    let (status, body) = post_review(
        service,
        json!({
            "code": "var x = 1;\neval(x);",
            "language": "javascript",
            "check_security": false,
            "check_best_practices": true,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detected_language"], "Javascript");
    assert_eq!(body["security_score"], 100);
    assert_eq!(body["quality_score"], 90);
    assert_eq!(body["optimized_code"], "var x = 1;");
    assert_eq!(body["explanation"], "stub for javascript");
    assert_eq!(body["complexity_reduction"], "50.0%");
}

#[tokio::test]
async fn test_health_reports_ai_enabled() {
    let filter = routes(Arc::new(ReviewService::new(10, Arc::new(StubGateway))));
    let resp = warp::test::request().path("/").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["message"], "CodeRefine API is running");
    assert_eq!(body["ai_enabled"], true);
}

/// 启动一个本地模拟的 chat-completions 服务，返回其 URL
async fn spawn_mock_ai(status: StatusCode, body: Value) -> String {
    let route = warp::path!("v1" / "chat" / "completions")
        .and(warp::post())
        .and(warp::header::<String>("authorization"))
        .map(move |auth: String| {
            assert_eq!(auth, "Bearer test-key");
            warp::reply::with_status(warp::reply::json(&body), status)
        });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{addr}/v1/chat/completions")
}

fn service_for(api_url: String) -> ReviewService {
    let config = AppConfig {
        ai: AIConfig {
            api_url,
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..AIConfig::default()
        },
        ..AppConfig::default()
    };
    ReviewService::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_remote_gateway_rewrite_is_parsed() {
    let content = "<think>plan</think>OPTIMIZED_CODE:\n```python\nprint(1 + 2)\n```\n\nEXPLANATION:\n## Summary\nFolded.";
    let url = spawn_mock_ai(
        StatusCode::OK,
        json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        }),
    )
    .await;

    let code = "a = 1\nb = 2\nc = a + b\nprint(c)";
    let (status, body) = post_review(service_for(url), json!({ "code": code })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["optimized_code"], "print(1 + 2)");
    assert_eq!(body["explanation"], "## Summary\nFolded.");
    assert_eq!(body["complexity_reduction"], "75.0%");
}

#[tokio::test]
async fn test_remote_gateway_error_degrades_to_200() {
    let url = spawn_mock_ai(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "message": "overloaded" } }),
    )
    .await;

    let code = "var total = 0;";
    let (status, body) = post_review(service_for(url), json!({ "code": code })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["optimized_code"], code);
    let explanation = body["explanation"].as_str().unwrap();
    assert!(explanation.starts_with("## Optimization Error"));
    assert!(explanation.contains("Deprecated Variable Declaration"));
}
