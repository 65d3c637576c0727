//! Contesting the other person's version of reality.

use layered_markers::{Detection, Detector};

use crate::errors::DetectorResult;
use crate::PatternDetector;

pub const MARKER_ID: &str = "ATO_REALITY_SHIFT";

const LEXICON: &[&str] = &[
    r"Realität",
    r"Wahrheit",
    r"Fakten\s*vs\.\s*Gefühle",
    r"Narrativ",
    r"du\s+konstruierst",
    r"das\s+entspricht\s+nicht\s+der\s+Wahrheit",
    r"reality",
    r"truth",
    r"your\s+narrative",
];

#[derive(Debug, Clone)]
pub struct RealityShiftDetector {
    inner: PatternDetector,
}

impl RealityShiftDetector {
    pub fn try_new() -> DetectorResult<Self> {
        let pattern = format!("(?i){}", LEXICON.join("|"));
        Ok(Self {
            inner: PatternDetector::try_new(MARKER_ID, &[pattern], 0.5)?,
        })
    }
}

impl Detector for RealityShiftDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, lang: &str) -> Vec<Detection> {
        self.inner.detect(text, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases_and_single_terms() {
        let detector = RealityShiftDetector::try_new().unwrap();
        insta::assert_debug_snapshot!(
            detector.detect("Das entspricht nicht der Wahrheit. Du konstruierst ein Narrativ.", "de"),
            @r###"
        [
            Detection(ATO_REALITY_SHIFT @ 0..33, conf: 0.50, "Das entspricht nicht der Wahrheit"),
            Detection(ATO_REALITY_SHIFT @ 35..50, conf: 0.50, "Du konstruierst"),
            Detection(ATO_REALITY_SHIFT @ 55..63, conf: 0.50, "Narrativ"),
        ]
        "###
        );
    }

    #[test]
    fn test_english_terms() {
        let detector = RealityShiftDetector::try_new().unwrap();
        let found = detector.detect("that's your narrative, not the truth", "en");
        let evidence: Vec<_> = found.iter().map(|d| d.evidence.as_str()).collect();
        assert_eq!(evidence, ["your narrative", "truth"]);
    }
}
