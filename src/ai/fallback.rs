// 降级输出：外部服务不可用时返回原始代码 + 静态分析建议

use std::fmt::Write;

use crate::analysis::Issue;
use crate::config::API_KEY_ENV;
use crate::errors::AIError;

use super::gateway::Optimization;
use super::parser::NO_REDUCTION;

/// Build the degraded output for a failed or unconfigured gateway call
pub fn fallback_optimization(code: &str, issues: &[Issue], error: &AIError) -> Optimization {
    let explanation = match error {
        AIError::MissingApiKey => unconfigured_explanation(issues),
        other => failure_explanation(issues, &other.to_string()),
    };

    Optimization {
        optimized_code: code.to_string(),
        explanation,
        complexity_reduction: Some(NO_REDUCTION.to_string()),
    }
}

fn unconfigured_explanation(issues: &[Issue]) -> String {
    let mut explanation = String::from(
        "API key not configured. Showing original code with basic recommendations:\n\n\
         Consider the following improvements:\n",
    );
    push_issue_list(&mut explanation, issues);
    let _ = write!(
        explanation,
        "\nFor full AI-powered optimization, please configure {API_KEY_ENV}."
    );
    explanation
}

fn failure_explanation(issues: &[Issue], reason: &str) -> String {
    let mut explanation = format!(
        "## Optimization Error\n\nUnable to generate AI optimization: {reason}\n\n\
         **Recommendations based on static analysis:**\n"
    );
    push_issue_list(&mut explanation, issues);
    explanation
}

fn push_issue_list(out: &mut String, issues: &[Issue]) {
    if issues.is_empty() {
        out.push_str("- No issues detected by static analysis.\n");
        return;
    }
    for issue in issues {
        let _ = writeln!(out, "- **{}**: {}", issue.title, issue.description);
    }
}
