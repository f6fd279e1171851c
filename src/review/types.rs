// review 类型定义模块
// /review 端点的请求与响应结构

use serde::{Deserialize, Serialize};

use crate::analysis::{CheckToggles, Issue};

/// Caller value meaning "run the detector"
pub const AUTO_LANGUAGE: &str = "auto";
pub const DEFAULT_DEPTH: &str = "standard";

/// 评审请求。可选字段缺省或为 null 时取默认值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub depth: Option<String>,
    #[serde(default)]
    pub check_security: Option<bool>,
    #[serde(default)]
    pub check_performance: Option<bool>,
    #[serde(default)]
    pub check_best_practices: Option<bool>,
}

impl ReviewRequest {
    /// 仅包含代码、其余取默认值的请求
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn toggles(&self) -> CheckToggles {
        CheckToggles {
            security: self.check_security.unwrap_or(true),
            performance: self.check_performance.unwrap_or(true),
            best_practices: self.check_best_practices.unwrap_or(true),
        }
    }

    /// `None` when the detector should decide
    pub fn pinned_language(&self) -> Option<&str> {
        let language = self.language.as_deref().unwrap_or(AUTO_LANGUAGE).trim();
        if language.is_empty() || language.eq_ignore_ascii_case(AUTO_LANGUAGE) {
            None
        } else {
            Some(language)
        }
    }

    pub fn depth(&self) -> &str {
        self.depth.as_deref().unwrap_or(DEFAULT_DEPTH)
    }
}

/// 评审结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub detected_language: String,
    pub quality_score: u8,
    pub security_score: u8,
    pub performance_score: u8,
    pub maintainability_score: u8,
    pub line_count: usize,
    pub complexity: String,
    pub issues: Vec<Issue>,
    pub optimized_code: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_reduction: Option<String>,
}

/// First character upper-cased, the rest lower-cased
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
