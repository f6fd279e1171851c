// 可选的情感探针：对短代码片段做一次文本分类，NEGATIVE 置信度高时轻微扣分

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SentimentConfig;
use crate::errors::AIError;

const NEGATIVE_LABEL: &str = "NEGATIVE";
const PROBE_TIMEOUT_SECS: u64 = 10;

/// Top-scoring label returned by the classifier
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentimentVerdict {
    pub label: String,
    pub score: f32,
}

impl SentimentVerdict {
    pub fn is_negative_above(&self, threshold: f32) -> bool {
        self.label.eq_ignore_ascii_case(NEGATIVE_LABEL) && self.score > threshold
    }
}

#[async_trait]
pub trait SentimentProbe: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentVerdict, AIError>;
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

// 推理 API 对单条输入有时返回 [[...]]，有时返回 [...]
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<SentimentVerdict>>),
    Flat(Vec<SentimentVerdict>),
}

impl InferenceResponse {
    fn top(self) -> Option<SentimentVerdict> {
        let verdicts = match self {
            InferenceResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(flat) => flat,
        };
        verdicts
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Hugging Face hosted inference endpoint
pub struct HuggingFaceSentiment {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl HuggingFaceSentiment {
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self, AIError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_token: api_token.into(),
        })
    }
}

#[async_trait]
impl SentimentProbe for HuggingFaceSentiment {
    async fn classify(&self, text: &str) -> Result<SentimentVerdict, AIError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AIError::ApiResponseError(status, body));
        }

        let parsed = response
            .json::<InferenceResponse>()
            .await
            .map_err(AIError::ResponseParseFailed)?;

        parsed.top().ok_or(AIError::NoChoiceInResponse)
    }
}

/// Build the probe when a token is configured; an invalid client setup
/// disables the probe instead of failing startup.
pub fn sentiment_from_config(config: &SentimentConfig) -> Option<Arc<dyn SentimentProbe>> {
    let token = config.api_token.as_ref()?;
    match HuggingFaceSentiment::new(config.api_url.clone(), token.clone()) {
        Ok(probe) => Some(Arc::new(probe)),
        Err(e) => {
            tracing::warn!("情感探针初始化失败，已禁用: {}", e);
            None
        }
    }
}
