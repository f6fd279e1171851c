use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};

use crate::errors::ConfigError;

use super::{
    ai_config::{AIConfig, PartialAIConfig},
    loader::ConfigLoader,
    sentiment_config::{PartialSentimentConfig, SentimentConfig},
    server_config::{PartialServerConfig, ServerConfig},
};

// Configuration location constants
pub const USER_CONFIG_PATH: &str = "~/.config/coderefine";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Main Application Configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub ai: AIConfig,
    pub server: ServerConfig,
    pub sentiment: SentimentConfig,
}

/// Partial Application Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialAppConfig {
    ai: Option<PartialAIConfig>,
    server: Option<PartialServerConfig>,
    sentiment: Option<PartialSentimentConfig>,
}

impl AppConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load_config()
    }

    /// Load configuration from an explicit file (which must exist)
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        ConfigLoader::with_config_path(path).load_config()
    }

    /// Create AppConfig from partial config and environment
    pub fn from_partial_and_env(
        partial: Option<PartialAppConfig>,
        env_map: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();

        let ai = AIConfig::from_env_or_file(partial.ai, &env_map)?;
        let server = ServerConfig::from_env_or_file(partial.server, &env_map)?;
        let sentiment = SentimentConfig::from_env_or_file(partial.sentiment, &env_map)?;

        Ok(AppConfig {
            ai,
            server,
            sentiment,
        })
    }

    /// Whether AI-assisted optimization is available
    pub fn ai_enabled(&self) -> bool {
        self.ai.is_enabled()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ai.validate()?;
        self.server.validate()?;
        self.sentiment.validate()?;
        Ok(())
    }
}
