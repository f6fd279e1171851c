use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;

use crate::errors::{invalid_value, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8000`
    pub addr: String,

    /// Largest accepted snippet, in characters (after trimming)
    pub max_code_length: usize,
}

/// Partial Server Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialServerConfig {
    pub addr: Option<String>,
    pub max_code_length: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            max_code_length: default_max_code_length(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_file(
        partial: Option<PartialServerConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();

        let addr = env_map
            .get("CODEREFINE_ADDR")
            .cloned()
            .or(partial.addr)
            .unwrap_or_else(default_addr);

        let max_code_length = match env_map.get("CODEREFINE_MAX_CODE_LENGTH") {
            Some(raw) => raw.parse().map_err(|_| {
                invalid_value("CODEREFINE_MAX_CODE_LENGTH", format!("'{raw}' is not a positive integer"))
            })?,
            None => partial.max_code_length.unwrap_or_else(default_max_code_length),
        };

        Ok(Self {
            addr,
            max_code_length,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.addr
            .parse()
            .map_err(|e| invalid_value("server.addr", format!("'{}': {}", self.addr, e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_code_length == 0 {
            return Err(invalid_value("server.max_code_length", "must be greater than zero"));
        }
        self.socket_addr().map(|_| ())
    }
}

// Default functions
fn default_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_max_code_length() -> usize {
    100_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_env_or_file(None, &HashMap::new()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.max_code_length, 100_000);
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_env_overrides() {
        let mut env_map = HashMap::new();
        env_map.insert("CODEREFINE_ADDR".to_string(), "127.0.0.1:9000".to_string());
        env_map.insert("CODEREFINE_MAX_CODE_LENGTH".to_string(), "50000".to_string());
        let partial = PartialServerConfig {
            addr: Some("127.0.0.1:1".to_string()),
            max_code_length: Some(10),
        };
        let config = ServerConfig::from_env_or_file(Some(partial), &env_map).unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.max_code_length, 50_000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_addr = ServerConfig {
            addr: "localhost".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad_addr.validate().is_err());

        let zero = ServerConfig {
            max_code_length: 0,
            ..ServerConfig::default()
        };
        assert!(zero.validate().is_err());
    }
}
