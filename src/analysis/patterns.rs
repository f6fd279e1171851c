// 语言特征注册表
//
// 每种语言对应一组有序的正则特征。表在首次访问时编译，之后只读。

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Static definition table. Order matters: it is the detector's tie-break order.
const SIGNATURE_TABLE: &[(&str, &[&str])] = &[
    (
        "python",
        &[
            r"def\s+\w+\s*\(",
            r"import\s+\w+",
            r"from\s+\w+\s+import",
            r"print\s*\(",
            r#"if\s+__name__\s*==\s*["']__main__["']"#,
            r"class\s+\w+\s*:",
            r":\s*$",
        ],
    ),
    (
        "javascript",
        &[
            r"function\s+\w+\s*\(",
            r"const\s+\w+\s*=",
            r"let\s+\w+\s*=",
            r"var\s+\w+\s*=",
            r"=>",
            r"console\.log",
            r"document\.",
            r"window\.",
        ],
    ),
    (
        "typescript",
        &[
            r"interface\s+\w+",
            r"type\s+\w+\s*=",
            r":\s*\w+\s*[;,\)]",
            r"function\s+\w+\s*\(",
            r"class\s+\w+",
            r"export\s+(default\s+)?(class|function|interface)",
        ],
    ),
    (
        "java",
        &[
            r"public\s+class",
            r"public\s+static\s+void\s+main",
            r"System\.out\.println",
            r"private\s+\w+\s+\w+",
            r"@\w+",
            r"package\s+\w+",
        ],
    ),
    (
        "cpp",
        &[
            r"#include\s*<",
            r"std::",
            r"cout\s*<<",
            r"int\s+main\s*\(",
            r"namespace\s+\w+",
            r"using\s+namespace",
        ],
    ),
    (
        "c",
        &[
            r"#include\s*<",
            r"printf\s*\(",
            r"int\s+main\s*\(",
            r"scanf\s*\(",
            r"malloc\s*\(",
        ],
    ),
    (
        "csharp",
        &[
            r"using\s+System",
            r"namespace\s+\w+",
            r"class\s+\w+",
            r"public\s+static\s+void\s+Main",
            r"Console\.WriteLine",
        ],
    ),
    (
        "go",
        &[
            r"func\s+\w+\s*\(",
            r"package\s+\w+",
            r"fmt\.Print",
            r"import\s+\(",
            r":=",
            r"go\s+\w+",
        ],
    ),
    (
        "rust",
        &[
            r"fn\s+\w+\s*\(",
            r"let\s+mut",
            r"println!",
            r"use\s+\w+",
            r"impl\s+\w+",
            r"struct\s+\w+",
        ],
    ),
    (
        "php",
        &[
            r"<\?php",
            r"\$\w+",
            r"echo\s+",
            r"function\s+\w+\s*\(",
            r"->",
        ],
    ),
    (
        "ruby",
        &[
            r"def\s+\w+",
            r"puts\s+",
            r"require\s+",
            r"end\s*$",
            r"class\s+\w+",
            r"@\w+",
        ],
    ),
    (
        "swift",
        &[
            r"func\s+\w+\s*\(",
            r"var\s+\w+",
            r"let\s+\w+",
            r"print\s*\(",
            r"import\s+\w+",
            r"class\s+\w+",
        ],
    ),
    (
        "kotlin",
        &[
            r"fun\s+\w+\s*\(",
            r"val\s+\w+",
            r"var\s+\w+",
            r"println\s*\(",
            r"class\s+\w+",
            r"object\s+\w+",
        ],
    ),
    (
        "sql",
        &[
            r"SELECT\s+",
            r"FROM\s+",
            r"WHERE\s+",
            r"INSERT\s+INTO",
            r"UPDATE\s+",
        ],
    ),
    ("html", &[r"<html", r"<div", r"<body", r"<!DOCTYPE"]),
    ("css", &[r"\.\w+\s*\{", r"#\w+\s*\{", r":\s*\w+;", r"@media"]),
];

/// One language label and its compiled signatures
#[derive(Debug)]
pub struct LanguageSignature {
    pub language: &'static str,
    pub patterns: Vec<Regex>,
}

/// Immutable, ordered registry of language signatures
#[derive(Debug)]
pub struct PatternRegistry {
    signatures: Vec<LanguageSignature>,
}

lazy_static! {
    static ref REGISTRY: PatternRegistry = PatternRegistry::from_table(SIGNATURE_TABLE)
        .expect("built-in language signatures must compile");
}

impl PatternRegistry {
    /// 进程级共享注册表
    pub fn global() -> &'static PatternRegistry {
        &REGISTRY
    }

    /// Compile a definition table. Patterns are case-insensitive and
    /// line-anchored (`^`/`$` match at every physical line, CRLF aware).
    pub fn from_table(table: &[(&'static str, &[&str])]) -> Result<Self, regex::Error> {
        let signatures = table
            .iter()
            .map(|(language, patterns)| {
                let patterns = patterns
                    .iter()
                    .map(|p| {
                        RegexBuilder::new(p)
                            .case_insensitive(true)
                            .multi_line(true)
                            .crlf(true)
                            .build()
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(LanguageSignature { language, patterns })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { signatures })
    }

    /// Signatures in registration order
    pub fn signatures(&self) -> &[LanguageSignature] {
        &self.signatures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 13] = [
        "python",
        "javascript",
        "typescript",
        "java",
        "c",
        "cpp",
        "csharp",
        "go",
        "rust",
        "php",
        "ruby",
        "swift",
        "kotlin",
    ];

    fn signature(language: &str) -> &'static LanguageSignature {
        PatternRegistry::global()
            .signatures()
            .iter()
            .find(|s| s.language == language)
            .unwrap_or_else(|| panic!("missing {language}"))
    }

    #[test]
    fn test_registry_covers_required_languages() {
        for lang in REQUIRED {
            assert!(!signature(lang).patterns.is_empty());
        }
    }

    #[test]
    fn test_optional_languages_registered_last() {
        let labels: Vec<_> = PatternRegistry::global()
            .signatures()
            .iter()
            .map(|s| s.language)
            .collect();
        assert_eq!(labels[0], "python");
        assert_eq!(&labels[labels.len() - 3..], &["sql", "html", "css"]);
    }

    #[test]
    fn test_line_anchored_patterns_match_per_line() {
        let python = signature("python");
        let colon_eol = python.patterns.last().unwrap();
        assert!(colon_eol.is_match("if x:\r\n    pass"));
        assert!(colon_eol.is_match("while True:\n    pass"));
        assert!(!colon_eol.is_match("a: int = 1"));
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        let table: &[(&'static str, &[&str])] = &[("broken", &[r"(unclosed"])];
        assert!(PatternRegistry::from_table(table).is_err());
    }
}
