//! Hedging and topic avoidance clustered closely enough to suggest
//! concealment.

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile_any, DetectorResult};
use crate::scoring::proximity_boost;

pub const MARKER_ID: &str = "SEM_LIE_CONCEALMENT";

const HEDGES: &[&str] = &[
    r"\beigentlich\b",
    r"\bsozusagen\b",
    r"\bim\s*Grunde\b",
    r"\bnur\b",
    r"\bkaum\b",
    r"\bnicht\s*wirklich\b",
    r"\bvielleicht\b",
    r"\bungefähr\b",
    r"\bso\sbisschen\b",
    r"\bwenn\s*du\s*willst\b",
    r"\broughly\b",
    r"\bkinda\b",
    r"\bsort of\b",
];
const AVOIDANCE: &[&str] = &[
    r"\bspäter\b",
    r"\bkein[e]? Details\b",
    r"\bkeine\s*Details\b",
    r"\bwill\s*nicht\s*(reden|darüber sprechen)\b",
    r"\bdarüber\s*möchte\s*ich\s*nicht\s*reden\b",
    r"\blass(\s*das)?\s*(Thema)?\b",
    r"\blass uns (nicht|mal)\b",
    r"\bchange of topic\b",
    r"\bdon't want to talk\b",
];

const BASE_SCORE: f64 = 0.4;
const PROXIMITY_RADIUS: usize = 80;
const PROXIMITY_FLOOR: f64 = 0.7;
const PROXIMITY_BONUS: f64 = 0.05;
const PROXIMITY_BONUS_CAP: f64 = 0.25;

/// Each hedge or avoidance phrase fires at 0.4. Phrases starting within 80
/// characters of another phrase are raised to at least 0.7, plus 0.05 per
/// neighbour (at most +0.25).
#[derive(Debug, Clone)]
pub struct LieConcealmentDetector {
    lexicon: Regex,
}

impl LieConcealmentDetector {
    pub fn try_new() -> DetectorResult<Self> {
        let all: Vec<&str> = HEDGES.iter().chain(AVOIDANCE).copied().collect();
        Ok(Self {
            lexicon: compile_any(MARKER_ID, &all)?,
        })
    }
}

impl Detector for LieConcealmentDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        let mut detections: Vec<Detection> = self
            .lexicon
            .find_iter(text)
            .map(|m| Detection::at_bytes(text, m.start(), m.end(), MARKER_ID, BASE_SCORE))
            .collect();

        proximity_boost(
            &mut detections,
            PROXIMITY_RADIUS,
            PROXIMITY_FLOOR,
            PROXIMITY_BONUS,
            PROXIMITY_BONUS_CAP,
        );
        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<Detection> {
        LieConcealmentDetector::try_new().unwrap().detect(text, "de")
    }

    #[test]
    fn test_isolated_hedge() {
        insta::assert_debug_snapshot!(detect("Das war eigentlich okay."), @r###"
        [
            Detection(SEM_LIE_CONCEALMENT @ 8..18, conf: 0.40, "eigentlich"),
        ]
        "###);
    }

    #[test]
    fn test_clustered_phrases_are_boosted() {
        insta::assert_debug_snapshot!(detect("Eigentlich nichts, vielleicht später."), @r###"
        [
            Detection(SEM_LIE_CONCEALMENT @ 0..10, conf: 0.80, "Eigentlich"),
            Detection(SEM_LIE_CONCEALMENT @ 19..29, conf: 0.80, "vielleicht"),
            Detection(SEM_LIE_CONCEALMENT @ 30..36, conf: 0.80, "später"),
        ]
        "###);
    }

    #[test]
    fn test_distant_phrases_stay_low() {
        let text = format!("eigentlich{}vielleicht", " ".repeat(100));
        let found = detect(&text);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|d| d.score == 0.4));
    }
}
