// 复杂度估算
//
// 行数 + 朴素嵌套计数的粗略估计，并非基于 AST 的圈复杂度。
// Known limitation: any line *containing* a block keyword as a substring
// opens a level, and only a line that is exactly `}` or `end` closes one, so
// one-line conditionals and indentation-based blocks (python) over-count.

use super::types::{count_non_blank_lines, Complexity};

const BLOCK_KEYWORDS: [&str; 6] = ["if", "for", "while", "def", "class", "function"];
const BLOCK_CLOSERS: [&str; 2] = ["}", "end"];

/// Intermediate measurements behind a complexity class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityReport {
    pub line_count: usize,
    pub max_nesting: usize,
    pub class: Complexity,
}

pub fn measure_complexity(code: &str) -> ComplexityReport {
    let line_count = count_non_blank_lines(code);

    let mut nesting = 0usize;
    let mut max_nesting = 0usize;
    for line in code.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if BLOCK_KEYWORDS.iter().any(|kw| trimmed.contains(kw)) {
            nesting += 1;
            max_nesting = max_nesting.max(nesting);
        }
        if BLOCK_CLOSERS.contains(&trimmed) {
            nesting = nesting.saturating_sub(1);
        }
    }

    ComplexityReport {
        line_count,
        max_nesting,
        class: classify(line_count, max_nesting),
    }
}

pub fn calculate_complexity(code: &str) -> Complexity {
    measure_complexity(code).class
}

fn classify(line_count: usize, max_nesting: usize) -> Complexity {
    if line_count > 200 || max_nesting > 5 {
        Complexity::High
    } else if line_count > 100 || max_nesting > 3 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}
