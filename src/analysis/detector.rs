// 语言检测器
//
// 对注册表中每种语言统计“至少命中一次”的特征数，取最高分；
// 同分时按注册顺序先到先得，全部为 0 时返回 "unknown"。

use super::patterns::PatternRegistry;

/// Sentinel label returned when no signature matches
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Per-language match counts for one snippet, in registry order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageScore {
    entries: Vec<(&'static str, usize)>,
}

impl LanguageScore {
    pub fn get(&self, language: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, score)| *score)
    }

    pub fn entries(&self) -> &[(&'static str, usize)] {
        &self.entries
    }

    /// Strictly greatest total wins; earlier registration wins ties
    pub fn best(&self) -> &'static str {
        let mut best: Option<(&'static str, usize)> = None;
        for &(lang, score) in &self.entries {
            match best {
                Some((_, top)) if score <= top => {}
                _ if score == 0 => {}
                _ => best = Some((lang, score)),
            }
        }
        best.map(|(lang, _)| lang).unwrap_or(UNKNOWN_LANGUAGE)
    }
}

/// Score a snippet against every registered language
pub fn score_languages(registry: &PatternRegistry, code: &str) -> LanguageScore {
    let entries = registry
        .signatures()
        .iter()
        .map(|sig| {
            let hits = sig.patterns.iter().filter(|re| re.is_match(code)).count();
            (sig.language, hits)
        })
        .collect();
    LanguageScore { entries }
}

/// Detect the language of a snippet using the process-wide registry
pub fn detect_language(code: &str) -> &'static str {
    detect_language_with(PatternRegistry::global(), code)
}

pub fn detect_language_with(registry: &PatternRegistry, code: &str) -> &'static str {
    let scores = score_languages(registry, code);
    let detected = scores.best();
    tracing::debug!(language = detected, scores = ?scores.entries(), "language detected");
    detected
}
