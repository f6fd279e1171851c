// 启发式质量分析器
//
// 纯函数：同样的代码与开关永远得到同样的问题序列与评分。
// 问题按检查执行顺序输出：通用最佳实践 -> 语言专属 -> 性能 -> 凭据。

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use super::types::{count_non_blank_lines, CheckToggles, Issue, Penalty, ScoreSet, Severity};

const LONG_BLOCK_LINES: usize = 100;
const SPARSE_COMMENT_MIN_LINES: usize = 20;
const MIN_COMMENT_LINES: usize = 3;
const MAX_LINE_CHARS: usize = 120;
const MAX_SINGLE_LETTER_ASSIGNMENTS: usize = 3;

/// Languages the hardcoded-credential check applies to
const CREDENTIAL_LANGUAGES: [&str; 3] = ["python", "javascript", "php"];

// 扣分表 (quality, security, performance, maintainability)
const LONG_BLOCK: Penalty = Penalty::new(10, 0, 0, 15);
const SPARSE_COMMENTS: Penalty = Penalty::new(5, 0, 0, 10);
const NO_FUNCTIONS: Penalty = Penalty::new(15, 0, 0, 20);
const POOR_NAMING: Penalty = Penalty::new(10, 0, 0, 15);
const DANGEROUS_CALL: Penalty = Penalty::new(20, 30, 0, 0);
const VAR_DECLARATION: Penalty = Penalty::new(10, 0, 0, 0);
const JS_EVAL: Penalty = Penalty::new(20, 30, 0, 0);
const INNER_HTML: Penalty = Penalty::new(0, 25, 0, 0);
const LONG_LINES: Penalty = Penalty::new(5, 0, 0, 0);
const TAB_INDENT: Penalty = Penalty::new(5, 0, 0, 10);
const HARDCODED_CREDENTIALS: Penalty = Penalty::new(20, 40, 0, 0);
/// Applied by the review flow when the sentiment probe flags the snippet
pub const NEGATIVE_SENTIMENT: Penalty = Penalty::new(5, 0, 0, 0);

lazy_static! {
    static ref PY_FUNCTION_DEF: Regex = Regex::new(r"def\s+\w+").unwrap();
    static ref SINGLE_LETTER_ASSIGN: Regex = Regex::new(r"\b[a-z]\s*=").unwrap();
    static ref HARDCODED_PASSWORD: Regex = RegexBuilder::new(r#"password\s*=\s*["'][^"']+["']"#)
        .case_insensitive(true)
        .build()
        .unwrap();
}

/// Issues in evaluation order plus the resulting scores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityReport {
    pub issues: Vec<Issue>,
    pub scores: ScoreSet,
}

#[derive(Default)]
struct Findings {
    issues: Vec<Issue>,
    scores: ScoreSet,
}

impl Findings {
    fn record(&mut self, issue: Issue, penalty: Penalty) {
        self.issues.push(issue);
        self.scores.penalize(penalty);
    }
}

/// Run every enabled check against `code` for the given language label
pub fn analyze_code_quality(code: &str, language: &str, toggles: CheckToggles) -> QualityReport {
    let mut findings = Findings::default();
    let lines: Vec<&str> = code.split('\n').collect();
    let line_count = count_non_blank_lines(code);

    if toggles.best_practices {
        check_general_practices(&lines, line_count, &mut findings);

        match language {
            "python" => check_python(code, toggles, &mut findings),
            "javascript" => check_javascript(code, toggles, &mut findings),
            _ => {}
        }
    }

    if toggles.performance {
        check_layout(code, &lines, &mut findings);
    }

    if toggles.security && CREDENTIAL_LANGUAGES.contains(&language) {
        check_credentials(code, &mut findings);
    }

    QualityReport {
        issues: findings.issues,
        scores: findings.scores,
    }
}

fn check_general_practices(lines: &[&str], line_count: usize, findings: &mut Findings) {
    if line_count > LONG_BLOCK_LINES {
        findings.record(
            Issue::new(
                "Long Code Block",
                "Code is quite long. Consider breaking it into smaller, more manageable functions or modules.",
                Severity::Warning,
            ),
            LONG_BLOCK,
        );
    }

    let comment_lines = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.starts_with('#') || l.starts_with("//"))
        .count();
    if line_count > SPARSE_COMMENT_MIN_LINES && comment_lines < MIN_COMMENT_LINES {
        findings.record(
            Issue::new(
                "Insufficient Comments",
                "Limited comments found. Add comments to explain complex logic and improve code readability.",
                Severity::Info,
            ),
            SPARSE_COMMENTS,
        );
    }
}

fn check_python(code: &str, toggles: CheckToggles, findings: &mut Findings) {
    if !PY_FUNCTION_DEF.is_match(code) {
        findings.record(
            Issue::new(
                "No Functions Defined",
                "No functions defined. Consider using functions for better code organization and reusability.",
                Severity::Warning,
            ),
            NO_FUNCTIONS,
        );
    }

    if SINGLE_LETTER_ASSIGN.find_iter(code).count() > MAX_SINGLE_LETTER_ASSIGNMENTS {
        findings.record(
            Issue::new(
                "Poor Variable Naming",
                "Too many single-letter variable names detected. Use descriptive names for better code readability.",
                Severity::Warning,
            ),
            POOR_NAMING,
        );
    }

    if toggles.security && (code.contains("eval(") || code.contains("exec(")) {
        findings.record(
            Issue::new(
                "Dangerous Function Usage",
                "Usage of eval() or exec() detected. These functions can execute arbitrary code and pose security risks.",
                Severity::Critical,
            ),
            DANGEROUS_CALL,
        );
    }
}

fn check_javascript(code: &str, toggles: CheckToggles, findings: &mut Findings) {
    if code.contains("var ") {
        findings.record(
            Issue::new(
                "Deprecated Variable Declaration",
                "Using 'var' instead of 'let' or 'const'. Use modern ES6+ declarations for better scoping.",
                Severity::Warning,
            ),
            VAR_DECLARATION,
        );
    }

    if !toggles.security {
        return;
    }

    if code.contains("eval(") {
        findings.record(
            Issue::new(
                "Security Risk: eval()",
                "eval() function detected. This can execute arbitrary code and is a security vulnerability.",
                Severity::Critical,
            ),
            JS_EVAL,
        );
    }

    if code.contains("innerHTML") && code.contains('=') {
        findings.record(
            Issue::new(
                "XSS Vulnerability Risk",
                "Direct innerHTML assignment detected. This may lead to XSS vulnerabilities. Consider using textContent or sanitization.",
                Severity::Critical,
            ),
            INNER_HTML,
        );
    }
}

fn check_layout(code: &str, lines: &[&str], findings: &mut Findings) {
    let long_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.chars().count() > MAX_LINE_CHARS)
        .map(|(i, _)| i + 1)
        .collect();
    if let Some(first) = long_lines.first() {
        findings.record(
            Issue::new(
                "Long Lines Detected",
                format!(
                    "Found {} lines longer than {} characters. Break them up for better readability.",
                    long_lines.len(),
                    MAX_LINE_CHARS
                ),
                Severity::Info,
            )
            .at(first.to_string()),
            LONG_LINES,
        );
    }

    if code.contains('\t') {
        findings.record(
            Issue::new(
                "Inconsistent Indentation",
                "Mixed tabs and spaces detected. Use consistent indentation (preferably spaces).",
                Severity::Warning,
            ),
            TAB_INDENT,
        );
    }
}

fn check_credentials(code: &str, findings: &mut Findings) {
    if HARDCODED_PASSWORD.is_match(code) {
        findings.record(
            Issue::new(
                "Hardcoded Credentials",
                "Hardcoded password detected in code. Store credentials in environment variables or secure vaults.",
                Severity::Critical,
            ),
            HARDCODED_CREDENTIALS,
        );
    }
}
