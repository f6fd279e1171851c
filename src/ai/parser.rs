// 解析模型输出：OPTIMIZED_CODE 代码块 + EXPLANATION 段落

use lazy_static::lazy_static;
use regex::Regex;

use super::gateway::Optimization;

const DEFAULT_EXPLANATION: &str = "Code has been analyzed. Please review the optimized version.";

// The regex patterns are compiled once using lazy_static
lazy_static! {
    static ref RE_THINK_TAGS: Regex = Regex::new(r"(?s)<think>.*?</think>").unwrap();
    static ref RE_OPTIMIZED_CODE: Regex =
        Regex::new(r"(?s)OPTIMIZED_CODE:\s*```(?:\w+)?\s*(.*?)\s*```").unwrap();
    static ref RE_EXPLANATION: Regex = Regex::new(r"(?s)EXPLANATION:\s*(.*)").unwrap();
}

/// Removes <think>...</think> tags and their content from a given string
pub fn clean_ai_output(text: &str) -> String {
    RE_THINK_TAGS.replace_all(text, "").into_owned()
}

/// Extract the rewrite and explanation; missing sections fall back to the
/// original code and a generic explanation.
pub fn parse_optimization_response(original_code: &str, response_text: &str) -> Optimization {
    let cleaned = clean_ai_output(response_text);

    let optimized_code = RE_OPTIMIZED_CODE
        .captures(&cleaned)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| original_code.to_string());

    let explanation = RE_EXPLANATION
        .captures(&cleaned)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

    let complexity_reduction = Some(complexity_reduction(original_code, &optimized_code));

    Optimization {
        optimized_code,
        explanation,
        complexity_reduction,
    }
}

/// `max(0, (orig - opt) / orig) * 100` over physical line counts, one decimal.
/// Degenerate input yields `"0.0%"`.
pub fn complexity_reduction(original: &str, optimized: &str) -> String {
    let original_lines = original.split('\n').count();
    if original_lines == 0 {
        return NO_REDUCTION.to_string();
    }
    let optimized_lines = optimized.split('\n').count();
    let reduction =
        ((original_lines as f64 - optimized_lines as f64) / original_lines as f64 * 100.0).max(0.0);
    format!("{reduction:.1}%")
}

/// Reported whenever no rewrite was produced
pub const NO_REDUCTION: &str = "0.0%";
