//! Colloquial tokens ("ey", "alter", "lol", "k").

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile, compile_any, DetectorResult};
use crate::scoring::Staircase;

pub const MARKER_ID: &str = "ATO_SLANG_TOKEN";

const TOKENS: &[&str] = &[
    r"\bey\b",
    r"\balter\b",
    r"\blol\b",
    r"\bwtf\b",
    r"\bkp\b",
    r"\bna\s*ja\b|\bnaja\b",
    r"\bbro\b",
    r"\btbh\b",
    r"\bidk\b",
    r"\byikes\b",
    r"\bmeh\b",
    r"\bk'?\b",
];

const SINGLE_TOKEN_SCORE: f64 = 0.4;
const STAIRS: Staircase = Staircase::new(0.7, 0.05, 0.8).offset(2);

/// Every match gets the same score, which depends on the total match count.
///
/// Typographic apostrophes are folded to `'` before matching; the fold is
/// char-for-char so spans still index the original text.
#[derive(Debug, Clone)]
pub struct SlangTokenDetector {
    apostrophes: Regex,
    tokens: Regex,
}

impl SlangTokenDetector {
    pub fn try_new() -> DetectorResult<Self> {
        Ok(Self {
            apostrophes: compile(MARKER_ID, "[’`´]")?,
            tokens: compile_any(MARKER_ID, TOKENS)?,
        })
    }
}

impl Detector for SlangTokenDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        let normalized = self.apostrophes.replace_all(text, "'");
        let matches: Vec<_> = self.tokens.find_iter(&normalized).collect();

        let score = match matches.len() {
            0 => return Vec::new(),
            1 => SINGLE_TOKEN_SCORE,
            n => STAIRS.score(n),
        };

        matches
            .into_iter()
            .map(|m| Detection::at_bytes(&normalized, m.start(), m.end(), MARKER_ID, score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_markers::Span;

    fn detect(text: &str) -> Vec<Detection> {
        SlangTokenDetector::try_new().unwrap().detect(text, "de")
    }

    #[test]
    fn test_single_token() {
        let found = detect("ey, was geht");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Some(Span::new(0, 2)));
        assert_eq!(found[0].score, 0.4);
    }

    #[test]
    fn test_many_tokens_share_score() {
        insta::assert_debug_snapshot!(detect("alter, lol, naja bro"), @r###"
        [
            Detection(ATO_SLANG_TOKEN @ 0..5, conf: 0.80, "alter"),
            Detection(ATO_SLANG_TOKEN @ 7..10, conf: 0.80, "lol"),
            Detection(ATO_SLANG_TOKEN @ 12..16, conf: 0.80, "naja"),
            Detection(ATO_SLANG_TOKEN @ 17..20, conf: 0.80, "bro"),
        ]
        "###);
    }

    #[test]
    fn test_typographic_apostrophe_keeps_char_offsets() {
        let found = detect("ok… k’ dann");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Some(Span::new(4, 5)));
        assert_eq!(found[0].evidence, "k");
    }

    #[test]
    fn test_no_slang() {
        assert!(detect("Guten Morgen, wie geht es dir?").is_empty());
    }
}
