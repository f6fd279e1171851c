use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::{invalid_value, ConfigError};

/// Environment variable carrying the generative-service credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// AI Configuration
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AIConfig {
    pub api_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

/// Partial AI Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialAIConfig {
    pub api_url: Option<String>,
    pub model_name: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub api_key: Option<String>,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            api_url: default_ai_api_url(),
            model_name: default_ai_model_name(),
            temperature: default_ai_temperature(),
            timeout_secs: default_ai_timeout_secs(),
            api_key: None,
        }
    }
}

impl AIConfig {
    /// Create AIConfig from environment variables and file config
    pub fn from_env_or_file(
        file_ai_config: Option<PartialAIConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let file = file_ai_config.unwrap_or_default();

        let api_url = env_map
            .get("CODEREFINE_AI_API_URL")
            .cloned()
            .or(file.api_url)
            .unwrap_or_else(default_ai_api_url);

        let model_name = env_map
            .get("CODEREFINE_AI_MODEL")
            .cloned()
            .or(file.model_name)
            .unwrap_or_else(default_ai_model_name);

        let temperature = match env_map.get("CODEREFINE_AI_TEMPERATURE") {
            Some(raw) => raw.parse().map_err(|_| {
                invalid_value("CODEREFINE_AI_TEMPERATURE", format!("'{raw}' is not a number"))
            })?,
            None => file.temperature.unwrap_or_else(default_ai_temperature),
        };

        let timeout_secs = match env_map.get("CODEREFINE_AI_TIMEOUT") {
            Some(raw) => raw.parse().map_err(|_| {
                invalid_value("CODEREFINE_AI_TIMEOUT", format!("'{raw}' is not a whole number of seconds"))
            })?,
            None => file.timeout_secs.unwrap_or_else(default_ai_timeout_secs),
        };

        // 空字符串视为未配置
        let api_key = env_map
            .get(API_KEY_ENV)
            .cloned()
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty());

        Ok(AIConfig {
            api_url,
            model_name,
            temperature,
            timeout_secs,
            api_key,
        })
    }

    /// AI-assisted optimization is enabled iff a credential is present
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid_value("ai.temperature", "must be within [0, 2]"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid_value("ai.timeout_secs", "must be greater than zero"));
        }
        if self.api_url.trim().is_empty() {
            return Err(invalid_value("ai.api_url", "must not be empty"));
        }
        Ok(())
    }
}

// Default functions
fn default_ai_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions".to_string()
}

fn default_ai_model_name() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_ai_temperature() -> f32 {
    0.2
}

fn default_ai_timeout_secs() -> u64 {
    60
}
