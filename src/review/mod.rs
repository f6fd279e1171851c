// review 模块 - 评审编排
// 请求校验、静态分析、AI 优化与响应组装

pub mod executor;
pub mod types;

pub use executor::ReviewService;
pub use types::{capitalize, ReviewRequest, ReviewResponse, AUTO_LANGUAGE, DEFAULT_DEPTH};
