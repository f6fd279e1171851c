use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::{invalid_value, ConfigError};

/// Optional sentiment probe (Hugging Face inference API)
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    /// Snippets at or above this many characters are not probed
    pub max_code_length: usize,
    /// NEGATIVE confidence above which the quality penalty applies
    pub threshold: f32,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialSentimentConfig {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub max_code_length: Option<usize>,
    pub threshold: Option<f32>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            max_code_length: default_max_code_length(),
            threshold: default_threshold(),
        }
    }
}

impl SentimentConfig {
    pub fn from_env_or_file(
        partial: Option<PartialSentimentConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();

        Ok(Self {
            api_url: env_map
                .get("CODEREFINE_SENTIMENT_URL")
                .cloned()
                .or(partial.api_url)
                .unwrap_or_else(default_api_url),
            api_token: env_map
                .get("HF_API_TOKEN")
                .cloned()
                .or(partial.api_token)
                .filter(|t| !t.trim().is_empty()),
            max_code_length: partial.max_code_length.unwrap_or_else(default_max_code_length),
            threshold: partial.threshold.unwrap_or_else(default_threshold),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_token.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(invalid_value("sentiment.threshold", "must be within [0, 1]"));
        }
        Ok(())
    }
}

fn default_api_url() -> String {
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english"
        .to_string()
}

fn default_max_code_length() -> usize {
    500
}

fn default_threshold() -> f32 {
    0.8
}
