use thiserror::Error;

/// Top-level error for the server binary
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("AI client error: {0}")]
    AI(#[from] AIError),
    #[error("Server error: {0}")]
    Server(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Failures talking to the generative service. These never leave the
/// orchestrator: every variant degrades to the static explanation.
#[derive(Debug, Error)]
pub enum AIError {
    #[error("AI API key is not configured")]
    MissingApiKey,
    #[error("AI API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse AI API JSON response: {0}")]
    ResponseParseFailed(#[source] reqwest::Error),
    #[error("AI API responded with error {0}: {1}")]
    ApiResponseError(reqwest::StatusCode, String),
    #[error("AI API response contained no choices.")]
    NoChoiceInResponse,
    #[error("AI returned an empty message.")]
    EmptyMessage,
}

/// Errors surfaced to HTTP callers from the review endpoint
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Code cannot be empty")]
    EmptyCode,
    #[error("Code is too long (max {max} characters)")]
    CodeTooLong { max: usize },
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ReviewError {
    /// Client input errors map to 4xx, everything else to 5xx
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReviewError::EmptyCode | ReviewError::CodeTooLong { .. })
    }
}

/// Shorthand for an `InvalidValue` config error
pub fn invalid_value(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}
