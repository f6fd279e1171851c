// analysis 值类型
// Issue / Severity / ScoreSet / Complexity

use serde::{Deserialize, Serialize};
use std::fmt;

/// 问题严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 静态分析发现的单个问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// 1-based 行号（字符串形式），无定位时为 null
    pub location: Option<String>,
}

impl Issue {
    pub fn new(title: &str, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity,
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// 四个维度的评分，均从 100 开始只减不增，下限为 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub quality: u8,
    pub security: u8,
    pub performance: u8,
    pub maintainability: u8,
}

impl Default for ScoreSet {
    fn default() -> Self {
        Self {
            quality: 100,
            security: 100,
            performance: 100,
            maintainability: 100,
        }
    }
}

/// 单个问题对各维度的扣分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Penalty {
    pub quality: u8,
    pub security: u8,
    pub performance: u8,
    pub maintainability: u8,
}

impl Penalty {
    pub const fn new(quality: u8, security: u8, performance: u8, maintainability: u8) -> Self {
        Self {
            quality,
            security,
            performance,
            maintainability,
        }
    }
}

impl ScoreSet {
    /// Apply a penalty, flooring every dimension at zero
    pub fn penalize(&mut self, penalty: Penalty) {
        self.quality = self.quality.saturating_sub(penalty.quality);
        self.security = self.security.saturating_sub(penalty.security);
        self.performance = self.performance.saturating_sub(penalty.performance);
        self.maintainability = self.maintainability.saturating_sub(penalty.maintainability);
    }
}

/// 粗粒度复杂度分级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which families of checks the analyzer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckToggles {
    pub security: bool,
    pub performance: bool,
    pub best_practices: bool,
}

impl Default for CheckToggles {
    fn default() -> Self {
        Self {
            security: true,
            performance: true,
            best_practices: true,
        }
    }
}

/// Non-blank physical line count, shared by every component that reports it
pub fn count_non_blank_lines(code: &str) -> usize {
    code.split('\n').filter(|l| !l.trim().is_empty()).count()
}
