pub mod ai_config;
pub mod app_config;
pub mod loader;
pub mod sentiment_config;
pub mod server_config;

// Re-export commonly used types
pub use ai_config::{AIConfig, API_KEY_ENV};
pub use app_config::{AppConfig, CONFIG_FILE_NAME, USER_CONFIG_PATH};
pub use loader::ConfigLoader;
pub use sentiment_config::SentimentConfig;
pub use server_config::ServerConfig;
