// AI 模块 - 优化网关、提示词、响应解析与降级
pub mod client;
pub mod fallback;
pub mod gateway;
pub mod parser;
pub mod prompts;
pub mod sentiment;

pub use client::ChatCompletionGateway;
pub use fallback::fallback_optimization;
pub use gateway::{
    gateway_from_config, AnalysisDepth, Optimization, OptimizationGateway, OptimizationRequest,
    UnconfiguredGateway,
};
pub use parser::{complexity_reduction, parse_optimization_response, NO_REDUCTION};
pub use sentiment::{sentiment_from_config, HuggingFaceSentiment, SentimentProbe, SentimentVerdict};
