// review 执行器模块
// 校验 -> 静态分析 -> 情感探针（可选）-> 优化网关（失败降级）-> 组装结果

use std::sync::Arc;

use crate::ai::{
    fallback_optimization, gateway_from_config, sentiment_from_config, Optimization,
    OptimizationGateway, OptimizationRequest, SentimentProbe,
};
use crate::analysis::{run_static_analysis, StaticAnalysis, NEGATIVE_SENTIMENT};
use crate::config::{AppConfig, SentimentConfig};
use crate::errors::{AIError, ReviewError};
use crate::logging::OperationTimer;

use super::types::{capitalize, ReviewRequest, ReviewResponse};

struct SentimentStep {
    probe: Arc<dyn SentimentProbe>,
    max_code_length: usize,
    threshold: f32,
}

/// Review orchestrator shared by every request
pub struct ReviewService {
    max_code_length: usize,
    gateway: Arc<dyn OptimizationGateway>,
    sentiment: Option<SentimentStep>,
}

impl ReviewService {
    pub fn new(max_code_length: usize, gateway: Arc<dyn OptimizationGateway>) -> Self {
        Self {
            max_code_length,
            gateway,
            sentiment: None,
        }
    }

    pub fn with_sentiment(mut self, probe: Arc<dyn SentimentProbe>, config: &SentimentConfig) -> Self {
        self.sentiment = Some(SentimentStep {
            probe,
            max_code_length: config.max_code_length,
            threshold: config.threshold,
        });
        self
    }

    /// 根据应用配置组装网关与可选的情感探针
    pub fn from_config(config: &AppConfig) -> Result<Self, AIError> {
        let gateway = gateway_from_config(&config.ai)?;
        let service = Self::new(config.server.max_code_length, gateway);
        Ok(match sentiment_from_config(&config.sentiment) {
            Some(probe) => service.with_sentiment(probe, &config.sentiment),
            None => service,
        })
    }

    pub fn max_code_length(&self) -> usize {
        self.max_code_length
    }

    /// 请求体字节上限。每个字符最多占 12 字节（代理对写成两个 `\uXXXX` 转义），另留 64 KiB 给其余字段
    pub fn request_body_limit(&self) -> u64 {
        (self.max_code_length as u64)
            .saturating_mul(12)
            .saturating_add(64 * 1024)
    }

    pub fn ai_enabled(&self) -> bool {
        self.gateway.is_available()
    }

    /// Trimmed snippet, or the client error explaining why it was refused
    pub fn validate<'a>(&self, code: &'a str) -> Result<&'a str, ReviewError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ReviewError::EmptyCode);
        }
        if code.chars().count() > self.max_code_length {
            return Err(ReviewError::CodeTooLong {
                max: self.max_code_length,
            });
        }
        Ok(code)
    }

    /// 执行一次完整评审。网关错误不会向上传播
    pub async fn execute_review(&self, request: ReviewRequest) -> Result<ReviewResponse, ReviewError> {
        let code = self.validate(&request.code)?.to_string();
        let pinned = request.pinned_language().map(str::to_string);
        let toggles = request.toggles();

        let timer = OperationTimer::new("review")
            .with_metadata("chars", code.chars().count())
            .with_metadata("pinned", pinned.is_some());

        // 纯 CPU 计算，放到阻塞线程池避免占用 reactor
        let analysis_code = code.clone();
        let mut analysis = tokio::task::spawn_blocking(move || {
            run_static_analysis(&analysis_code, pinned.as_deref(), toggles)
        })
        .await
        .map_err(|e| {
            tracing::error!("静态分析任务失败: {}", e);
            ReviewError::Internal(e.to_string())
        })?;

        self.apply_sentiment(&code, &mut analysis).await;

        let optimization = self.optimize(&code, &analysis, request.depth()).await;

        let timer = timer
            .with_metadata("language", &analysis.language)
            .with_metadata("issues", analysis.issues.len());
        timer.finish();

        Ok(assemble_response(analysis, optimization))
    }

    async fn apply_sentiment(&self, code: &str, analysis: &mut StaticAnalysis) {
        let Some(step) = &self.sentiment else {
            return;
        };
        if code.chars().count() >= step.max_code_length {
            return;
        }

        let sample: String = code.chars().take(step.max_code_length).collect();
        match step.probe.classify(&sample).await {
            Ok(verdict) if verdict.is_negative_above(step.threshold) => {
                tracing::debug!(score = verdict.score, "情感探针判定为负面，质量分 -5");
                analysis.scores.penalize(NEGATIVE_SENTIMENT);
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Sentiment analysis failed: {}", e),
        }
    }

    async fn optimize(&self, code: &str, analysis: &StaticAnalysis, depth: &str) -> Optimization {
        let request = OptimizationRequest {
            code,
            language: &analysis.language,
            issues: &analysis.issues,
            depth,
        };

        match self.gateway.optimize(request).await {
            Ok(optimization) => optimization,
            Err(AIError::MissingApiKey) => {
                tracing::debug!("未配置 AI 密钥，返回静态建议");
                fallback_optimization(code, &analysis.issues, &AIError::MissingApiKey)
            }
            Err(e) => {
                tracing::error!(model = %self.gateway.model_info(), "AI 优化失败，降级为静态建议: {}", e);
                fallback_optimization(code, &analysis.issues, &e)
            }
        }
    }
}

fn assemble_response(analysis: StaticAnalysis, optimization: Optimization) -> ReviewResponse {
    ReviewResponse {
        detected_language: capitalize(&analysis.language),
        quality_score: analysis.scores.quality,
        security_score: analysis.scores.security,
        performance_score: analysis.scores.performance,
        maintainability_score: analysis.scores.maintainability,
        line_count: analysis.line_count,
        complexity: analysis.complexity.to_string(),
        issues: analysis.issues,
        optimized_code: optimization.optimized_code,
        explanation: optimization.explanation,
        complexity_reduction: optimization.complexity_reduction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{SentimentVerdict, UnconfiguredGateway};
    use async_trait::async_trait;

    struct EchoGateway;

    #[async_trait]
    impl OptimizationGateway for EchoGateway {
        async fn optimize(&self, request: OptimizationRequest<'_>) -> Result<Optimization, AIError> {
            Ok(Optimization {
                optimized_code: format!("// {}\n{}", request.language, request.code),
                explanation: format!("{} issues, depth {}", request.issues.len(), request.depth),
                complexity_reduction: Some("0.0%".to_string()),
            })
        }

        fn is_available(&self) -> bool {
            true
        }

        fn model_info(&self) -> String {
            "echo".to_string()
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl OptimizationGateway for FailingGateway {
        async fn optimize(&self, _request: OptimizationRequest<'_>) -> Result<Optimization, AIError> {
            Err(AIError::EmptyMessage)
        }

        fn is_available(&self) -> bool {
            true
        }

        fn model_info(&self) -> String {
            "failing".to_string()
        }
    }

    struct FixedSentiment(SentimentVerdict);

    #[async_trait]
    impl SentimentProbe for FixedSentiment {
        async fn classify(&self, _text: &str) -> Result<SentimentVerdict, AIError> {
            Ok(self.0.clone())
        }
    }

    fn negative() -> Arc<dyn SentimentProbe> {
        Arc::new(FixedSentiment(SentimentVerdict {
            label: "NEGATIVE".to_string(),
            score: 0.95,
        }))
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_code_rejected() {
        let service = ReviewService::new(100, Arc::new(UnconfiguredGateway));
        for code in ["", "   \n\t  "] {
            let err = service.execute_review(ReviewRequest::new(code)).await.unwrap_err();
            assert_eq!(err, ReviewError::EmptyCode);
        }
    }

    #[tokio::test]
    async fn test_oversized_code_rejected() {
        let service = ReviewService::new(10, Arc::new(UnconfiguredGateway));
        let err = service
            .execute_review(ReviewRequest::new("x".repeat(11)))
            .await
            .unwrap_err();
        assert_eq!(err, ReviewError::CodeTooLong { max: 10 });
        // 边界值允许
        assert!(service.execute_review(ReviewRequest::new("x".repeat(10))).await.is_ok());
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_returns_original_code() {
        let service = ReviewService::new(1000, Arc::new(UnconfiguredGateway));
        let response = service
            .execute_review(ReviewRequest::new("  var x = 1;\n"))
            .await
            .unwrap();
        assert_eq!(response.detected_language, "Javascript");
        assert_eq!(response.optimized_code, "var x = 1;");
        assert!(response.explanation.contains("Deprecated Variable Declaration"));
        assert_eq!(response.complexity_reduction.as_deref(), Some("0.0%"));
        assert_eq!(response.complexity, "Low");
    }

    #[tokio::test]
    async fn test_gateway_failure_degrades() {
        let service = ReviewService::new(1000, Arc::new(FailingGateway));
        let response = service
            .execute_review(ReviewRequest::new("print(eval(input()))"))
            .await
            .unwrap();
        assert_eq!(response.optimized_code, "print(eval(input()))");
        assert!(response.explanation.starts_with("## Optimization Error"));
        assert!(response.explanation.contains("Dangerous Function Usage"));
    }

    #[tokio::test]
    async fn test_gateway_receives_language_issues_and_depth() {
        let service = ReviewService::new(1000, Arc::new(EchoGateway));
        let mut request = ReviewRequest::new("var x = 1;");
        request.language = Some("JavaScript".to_string());
        request.depth = Some("deep".to_string());
        let response = service.execute_review(request).await.unwrap();
        assert!(response.optimized_code.starts_with("// javascript\n"));
        assert_eq!(response.explanation, "1 issues, depth deep");
        assert_eq!(response.detected_language, "Javascript");
    }

    #[tokio::test]
    async fn test_negative_sentiment_costs_quality() {
        let config = SentimentConfig::default();
        let base = ReviewService::new(1000, Arc::new(EchoGateway));
        let probed = ReviewService::new(1000, Arc::new(EchoGateway)).with_sentiment(negative(), &config);

        let code = "fn main() {\n    let value = 1;\n}";
        let plain = base.execute_review(ReviewRequest::new(code)).await.unwrap();
        let flagged = probed.execute_review(ReviewRequest::new(code)).await.unwrap();
        assert_eq!(flagged.quality_score + 5, plain.quality_score);
        assert_eq!(flagged.security_score, plain.security_score);
    }

    #[tokio::test]
    async fn test_sentiment_skipped_for_long_snippets() {
        let config = SentimentConfig {
            max_code_length: 10,
            ..SentimentConfig::default()
        };
        let service = ReviewService::new(1000, Arc::new(EchoGateway)).with_sentiment(negative(), &config);
        let response = service
            .execute_review(ReviewRequest::new("fn main() { let value = 1; }"))
            .await
            .unwrap();
        assert_eq!(response.quality_score, 100);
    }

    #[test]
    fn test_service_from_default_config() {
        let service = ReviewService::from_config(&AppConfig::default()).unwrap();
        assert!(!service.ai_enabled());
        assert_eq!(service.max_code_length(), 100_000);
        assert_eq!(service.request_body_limit(), 1_265_536);
    }
}
