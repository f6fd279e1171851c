// analysis 模块 - 纯文本静态分析核心
// 注册表 -> 语言检测 -> 复杂度估算 + 质量启发式

pub mod complexity;
pub mod detector;
pub mod patterns;
pub mod quality;
pub mod types;

pub use complexity::{calculate_complexity, measure_complexity, ComplexityReport};
pub use detector::{detect_language, score_languages, LanguageScore, UNKNOWN_LANGUAGE};
pub use patterns::{LanguageSignature, PatternRegistry};
pub use quality::{analyze_code_quality, QualityReport, NEGATIVE_SENTIMENT};
pub use types::{CheckToggles, Complexity, Issue, Penalty, ScoreSet, Severity};

/// Everything the static path produces for one snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAnalysis {
    pub language: String,
    pub line_count: usize,
    pub complexity: Complexity,
    pub issues: Vec<Issue>,
    pub scores: ScoreSet,
}

/// Run detection (unless `pinned_language` is given), complexity estimation
/// and the heuristic checks. Never fails for any input string.
pub fn run_static_analysis(
    code: &str,
    pinned_language: Option<&str>,
    toggles: CheckToggles,
) -> StaticAnalysis {
    let language = match pinned_language {
        Some(lang) => lang.trim().to_lowercase(),
        None => detect_language(code).to_string(),
    };

    let complexity = measure_complexity(code);
    let quality = analyze_code_quality(code, &language, toggles);

    StaticAnalysis {
        language,
        line_count: complexity.line_count,
        complexity: complexity.class,
        issues: quality.issues,
        scores: quality.scores,
    }
}
