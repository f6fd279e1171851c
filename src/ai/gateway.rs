// AI 优化网关接口
//
// 代码 + 语言 + 静态问题 -> 优化后的代码 + 说明。
// 编排器只依赖该 trait，测试时注入确定性的桩实现。

use std::sync::Arc;

use async_trait::async_trait;

use crate::analysis::Issue;
use crate::config::AIConfig;
use crate::errors::AIError;

use super::client::ChatCompletionGateway;

/// Requested depth of the rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisDepth {
    Quick,
    Standard,
    Deep,
}

impl AnalysisDepth {
    /// Unknown values fall back to `Standard`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "quick" => AnalysisDepth::Quick,
            "deep" => AnalysisDepth::Deep,
            _ => AnalysisDepth::Standard,
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            AnalysisDepth::Quick => {
                "Provide a quick optimization focusing on the most critical issues."
            }
            AnalysisDepth::Standard => {
                "Provide standard optimizations covering major issues and improvements."
            }
            AnalysisDepth::Deep => {
                "Provide deep analysis with comprehensive optimizations, refactoring suggestions, and performance improvements."
            }
        }
    }
}

/// Input handed to the gateway
#[derive(Debug, Clone, Copy)]
pub struct OptimizationRequest<'a> {
    pub code: &'a str,
    pub language: &'a str,
    pub issues: &'a [Issue],
    /// Raw depth hint as sent by the caller
    pub depth: &'a str,
}

/// Gateway output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimization {
    pub optimized_code: String,
    pub explanation: String,
    /// `"<n.n>%"`, see [`super::parser::complexity_reduction`]
    pub complexity_reduction: Option<String>,
}

/// AI 优化网关抽象接口
#[async_trait]
pub trait OptimizationGateway: Send + Sync {
    /// 生成优化代码与说明。任何错误都由调用方降级处理
    async fn optimize(&self, request: OptimizationRequest<'_>) -> Result<Optimization, AIError>;

    /// 是否配置了可用的外部服务
    fn is_available(&self) -> bool;

    /// 获取模型信息
    fn model_info(&self) -> String;
}

/// Stand-in used when no credential is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGateway;

#[async_trait]
impl OptimizationGateway for UnconfiguredGateway {
    async fn optimize(&self, _request: OptimizationRequest<'_>) -> Result<Optimization, AIError> {
        Err(AIError::MissingApiKey)
    }

    fn is_available(&self) -> bool {
        false
    }

    fn model_info(&self) -> String {
        "unconfigured".to_string()
    }
}

/// 根据配置创建网关：有密钥时走外部服务，否则返回降级实现
pub fn gateway_from_config(config: &AIConfig) -> Result<Arc<dyn OptimizationGateway>, AIError> {
    if config.is_enabled() {
        Ok(Arc::new(ChatCompletionGateway::new(config)?))
    } else {
        Ok(Arc::new(UnconfiguredGateway))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_parsing() {
        assert_eq!(AnalysisDepth::parse("quick"), AnalysisDepth::Quick);
        assert_eq!(AnalysisDepth::parse(" DEEP "), AnalysisDepth::Deep);
        assert_eq!(AnalysisDepth::parse("standard"), AnalysisDepth::Standard);
        assert_eq!(AnalysisDepth::parse("exhaustive"), AnalysisDepth::Standard);
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_reports_missing_key() {
        let gateway = UnconfiguredGateway;
        let request = OptimizationRequest {
            code: "x = 1",
            language: "python",
            issues: &[],
            depth: "standard",
        };
        assert!(matches!(
            gateway.optimize(request).await,
            Err(AIError::MissingApiKey)
        ));
        assert!(!gateway.is_available());
    }

    #[test]
    fn test_gateway_from_config() {
        let gateway = gateway_from_config(&AIConfig::default()).unwrap();
        assert!(!gateway.is_available());

        let configured = AIConfig {
            api_key: Some("key".to_string()),
            ..AIConfig::default()
        };
        let gateway = gateway_from_config(&configured).unwrap();
        assert!(gateway.is_available());
        assert_eq!(gateway.model_info(), "gemini-1.5-flash");
    }
}
