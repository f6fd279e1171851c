// AI 提示词构建

use crate::types::ai::ChatMessage;

use super::gateway::{AnalysisDepth, OptimizationRequest};

/// Render the issue list the way the model sees it
pub fn format_issues(request: &OptimizationRequest<'_>) -> String {
    if request.issues.is_empty() {
        return "- None detected by static analysis".to_string();
    }
    request
        .issues
        .iter()
        .map(|i| {
            format!(
                "- [{}] {}: {}",
                i.severity.as_str().to_uppercase(),
                i.title,
                i.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn system_prompt(language: &str) -> String {
    format!("You are an expert code reviewer and optimizer specializing in {language}.")
}

/// User prompt asking for an `OPTIMIZED_CODE:` block and an `EXPLANATION:` section
pub fn optimization_prompt(request: &OptimizationRequest<'_>) -> String {
    let language = request.language;
    let depth = AnalysisDepth::parse(request.depth);

    format!(
        r#"Analysis Depth: {raw_depth}
{instructions}

Original Code:
```{language}
{code}
```

Issues Detected:
{issues}

Please provide:
1. An optimized version of the code that addresses all issues
2. A beginner-friendly explanation of changes
3. Performance improvements and best practices applied

Format your response EXACTLY as follows:

OPTIMIZED_CODE:
```{language}
[your optimized code here]
```

EXPLANATION:
## Summary
[Brief overview of changes]

## Key Improvements
- [Improvement 1]
- [Improvement 2]
- [Improvement 3]

## Security Enhancements
[Security improvements if applicable]

## Performance Optimizations
[Performance improvements if applicable]

## Best Practices Applied
[Best practices implemented]

## Learning Points
[Educational insights for beginners]
"#,
        raw_depth = request.depth,
        instructions = depth.instructions(),
        code = request.code,
        issues = format_issues(request),
    )
}

pub fn build_messages(request: &OptimizationRequest<'_>) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(request.language)),
        ChatMessage::user(optimization_prompt(request)),
    ]
}
