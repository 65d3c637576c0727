//! Idealizing and devaluing the same person in close succession.

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile, DetectorResult};
use crate::scoring::co_occurrence;

pub const MARKER_ID: &str = "SEM_IDEALIZATION_DEVALUATION";

const IDEALIZING: &str = r"(?i)(perfekt|einzigartig|bester\s+mensch|so\s+gut\s+für\s+mich|am\s+besten|wundervoll|amazing|perfect|the\s+best)";
const DEVALUING: &str =
    r"(?i)(lächerlich|absurd|schrecklich|hasse|furchtbar|disgusting|ridiculous|hate)";

/// Characters searched on either side of an idealizing match
const RADIUS: usize = 120;
const SCORE: f64 = 0.85;

#[derive(Debug, Clone)]
pub struct IdealizationDevaluationDetector {
    idealizing: Regex,
    devaluing: Regex,
}

impl IdealizationDevaluationDetector {
    pub fn try_new() -> DetectorResult<Self> {
        Ok(Self {
            idealizing: compile(MARKER_ID, IDEALIZING)?,
            devaluing: compile(MARKER_ID, DEVALUING)?,
        })
    }
}

impl Detector for IdealizationDevaluationDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        co_occurrence(text, &self.idealizing, &self.devaluing, RADIUS, MARKER_ID, SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<Detection> {
        IdealizationDevaluationDetector::try_new().unwrap().detect(text, "de")
    }

    #[test]
    fn test_merged_span() {
        insta::assert_debug_snapshot!(detect("Du warst perfekt, jetzt bist du lächerlich"), @r###"
        [
            Detection(SEM_IDEALIZATION_DEVALUATION @ 9..42, conf: 0.85, "perfekt … lächerlich"),
        ]
        "###);
    }

    #[test]
    fn test_one_detection_per_idealizing_match() {
        let found = detect("wundervoll und einzigartig, aber absurd");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|d| d.evidence.ends_with("absurd")));
    }

    #[test]
    fn test_praise_alone() {
        assert!(detect("Du bist einfach wundervoll").is_empty());
    }
}
