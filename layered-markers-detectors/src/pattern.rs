//! Generic lexicon detector: one fixed score per regex match.

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile, DetectorResult};

/// Emits one detection per match of any of its patterns, all at the same
/// score.
///
/// Patterns are joined into a single alternation, so overlapping patterns
/// produce non-overlapping matches in text order. Flags such as `(?i)` go
/// inside the pattern strings.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    marker_id: String,
    pattern: Regex,
    score: f64,
}

impl PatternDetector {
    pub fn try_new<S: AsRef<str>>(
        marker_id: impl Into<String>,
        patterns: &[S],
        score: f64,
    ) -> DetectorResult<Self> {
        let marker_id = marker_id.into();
        let joined = patterns
            .iter()
            .map(|p| format!("(?:{})", p.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = compile(&marker_id, &joined)?;
        Ok(PatternDetector {
            marker_id,
            pattern,
            score,
        })
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

impl Detector for PatternDetector {
    fn marker_id(&self) -> &str {
        &self.marker_id
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        self.pattern
            .find_iter(text)
            .map(|m| Detection::at_bytes(text, m.start(), m.end(), &self.marker_id, self.score))
            .collect()
    }
}
