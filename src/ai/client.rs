// OpenAI 兼容的 chat-completions 客户端（默认指向 Gemini 的兼容端点）
//
// 单次请求，不重试；失败由编排器降级为静态说明。

use std::time::Duration;

use async_trait::async_trait;

use crate::config::AIConfig;
use crate::errors::AIError;
use crate::types::ai::{ChatMessage, OpenAIChatCompletionResponse, OpenAIChatRequest};

use super::gateway::{Optimization, OptimizationGateway, OptimizationRequest};
use super::parser::parse_optimization_response;
use super::prompts::build_messages;

/// Gateway backed by an OpenAI-compatible chat-completions endpoint
pub struct ChatCompletionGateway {
    client: reqwest::Client,
    api_url: String,
    model_name: String,
    temperature: f32,
    api_key: Option<String>,
}

impl ChatCompletionGateway {
    /// The HTTP client is built once so connections are reused across requests
    pub fn new(config: &AIConfig) -> Result<Self, AIError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model_name: config.model_name.clone(),
            temperature: config.temperature,
            api_key: config.api_key.clone(),
        })
    }

    /// Send the messages and return the first choice's content
    pub async fn execute_ai_request(&self, messages: Vec<ChatMessage>) -> Result<String, AIError> {
        let request_payload = OpenAIChatRequest {
            model: self.model_name.clone(),
            messages,
            temperature: Some(self.temperature),
            stream: false,
        };

        tracing::debug!(
            model = %self.model_name,
            url = %self.api_url,
            "正在发送优化请求到 AI"
        );

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(api_key) = &self.api_key {
            request_builder = request_builder.bearer_auth(api_key);
        }

        let response = request_builder
            .json(&request_payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("发送 AI 优化请求失败: {}", e);
                AIError::RequestFailed(e)
            })?;

        if !response.status().is_success() {
            let status_code = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body from AI response".to_string());
            tracing::error!("AI API 请求失败，状态码: {}: {}", status_code, body);
            return Err(AIError::ApiResponseError(status_code, body));
        }

        let response_data = response
            .json::<OpenAIChatCompletionResponse>()
            .await
            .map_err(|e| {
                tracing::error!("解析 AI 响应 JSON 失败: {}", e);
                AIError::ResponseParseFailed(e)
            })?;

        let choice = response_data.choices.first().ok_or_else(|| {
            tracing::warn!("AI 响应中没有 choices");
            AIError::NoChoiceInResponse
        })?;

        let content = choice.message.content.trim();
        if content.is_empty() {
            tracing::warn!("AI 返回了空的消息内容");
            return Err(AIError::EmptyMessage);
        }

        tracing::debug!(
            "收到 AI 回复 (前 100 个字符): \"{}\"",
            content.chars().take(100).collect::<String>()
        );
        Ok(content.to_string())
    }
}

#[async_trait]
impl OptimizationGateway for ChatCompletionGateway {
    async fn optimize(&self, request: OptimizationRequest<'_>) -> Result<Optimization, AIError> {
        let messages = build_messages(&request);
        let response_text = self.execute_ai_request(messages).await?;
        Ok(parse_optimization_response(request.code, &response_text))
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn model_info(&self) -> String {
        self.model_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(url: &str) -> AIConfig {
        AIConfig {
            api_url: url.to_string(),
            api_key: Some("test-key".to_string()),
            timeout_secs: 2,
            ..AIConfig::default()
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        // port 9 (discard) on localhost is not expected to serve HTTP
        let gateway = ChatCompletionGateway::new(&config_for("http://127.0.0.1:9/v1/chat")).unwrap();
        let request = OptimizationRequest {
            code: "x = 1",
            language: "python",
            issues: &[],
            depth: "standard",
        };
        let result = gateway.optimize(request).await;
        assert!(matches!(result, Err(AIError::RequestFailed(_))));
    }

    #[test]
    fn test_gateway_reports_model() {
        let gateway = ChatCompletionGateway::new(&config_for("http://localhost")).unwrap();
        assert_eq!(gateway.model_info(), "gemini-1.5-flash");
        assert!(gateway.is_available());
    }
}
