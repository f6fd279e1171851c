use std::{collections::HashMap, env, fs, path::PathBuf};

use crate::errors::ConfigError;

use super::app_config::{AppConfig, PartialAppConfig, CONFIG_FILE_NAME, USER_CONFIG_PATH};

/// Configuration loader responsible for loading config from files and environment
pub struct ConfigLoader {
    /// Explicit config file; when set, a missing file is an error
    config_path: Option<PathBuf>,
    /// Environment snapshot; `None` means read the process environment
    env_override: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Create a new config loader with default paths
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_override: None,
        }
    }

    /// Create a config loader for an explicit config file
    pub fn with_config_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
            env_override: None,
        }
    }

    /// Use a fixed environment map instead of the process environment (for testing)
    pub fn with_env(mut self, env_map: HashMap<String, String>) -> Self {
        self.env_override = Some(env_map);
        self
    }

    /// Load complete application configuration
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let partial_config = self.load_partial_config()?;
        let env_map = self.collect_env_vars();

        let config = AppConfig::from_partial_and_env(partial_config, env_map)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location with tilde expansion
    pub fn default_config_path() -> PathBuf {
        let expanded = shellexpand::tilde(USER_CONFIG_PATH);
        PathBuf::from(expanded.as_ref()).join(CONFIG_FILE_NAME)
    }

    fn load_partial_config(&self) -> Result<Option<PartialAppConfig>, ConfigError> {
        let (path, required) = match &self.config_path {
            Some(path) => (path.clone(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if required {
                return Err(ConfigError::FileRead(
                    path.to_string_lossy().to_string(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                ));
            }
            tracing::debug!("未找到配置文件 {}，使用默认配置与环境变量", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| ConfigError::FileRead(path.to_string_lossy().to_string(), e))?;
        let partial = toml::from_str::<PartialAppConfig>(&content)
            .map_err(|e| ConfigError::TomlParse(path.to_string_lossy().to_string(), e))?;

        tracing::info!("已加载配置文件 {}", path.display());
        Ok(Some(partial))
    }

    fn collect_env_vars(&self) -> HashMap<String, String> {
        match &self.env_override {
            Some(env_map) => env_map.clone(),
            None => env::vars().collect(),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
