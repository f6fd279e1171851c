pub mod ai;
pub mod analysis;
pub mod config;
pub mod errors;
pub mod logging;
pub mod review;
pub mod server;
pub mod types;

// Re-export commonly used items for convenience
pub use analysis::{detect_language, run_static_analysis, StaticAnalysis};
pub use config::AppConfig;
pub use errors::{AIError, AppError, ConfigError, ReviewError};
pub use review::{ReviewRequest, ReviewResponse, ReviewService};
