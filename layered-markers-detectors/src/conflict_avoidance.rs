//! Indirect conflict avoidance: changing the subject, playing things down,
//! putting things off.

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile_any, DetectorResult};

pub const MARKER_ID: &str = "CLU_INDIRECT_CONFLICT_AVOIDANCE";

const SHIFT: &[&str] = &[
    r"\banderes\s+Thema\b",
    r"\begal\s+jetzt\b",
    r"\blass\s+gut\s+sein\b",
    r"\bnicht\s+der\s+richtige\s+Moment\b",
];
const MINIMIZATION: &[&str] = &[
    r"\bkein\s+Drama\b",
    r"\bnicht\s+so\s+wichtig\b",
    r"\bhalb\s+so\s+wild\b",
];
const DEFERRAL: &[&str] = &[r"\bspäter\b", r"\banderswann\b", r"\bnot\s+now\b"];

const SHIFT_SCORE: f64 = 0.7;
const COMBINED_SCORE: f64 = 0.75;
const PARTIAL_SCORE: f64 = 0.45;

/// Three tiers:
///
/// 1. every topic shift fires at 0.7
/// 2. minimization together with deferral fires once, span-less, at 0.75
/// 3. minimization or deferral alone fires per occurrence at 0.45
///
/// Tiers 2 and 3 are exclusive; tier 1 is independent of both.
#[derive(Debug, Clone)]
pub struct ConflictAvoidanceDetector {
    shift: Regex,
    minimization: Regex,
    deferral: Regex,
}

impl ConflictAvoidanceDetector {
    pub fn try_new() -> DetectorResult<Self> {
        Ok(Self {
            shift: compile_any(MARKER_ID, SHIFT)?,
            minimization: compile_any(MARKER_ID, MINIMIZATION)?,
            deferral: compile_any(MARKER_ID, DEFERRAL)?,
        })
    }

    fn scan(&self, regex: &Regex, text: &str, score: f64) -> Vec<Detection> {
        regex
            .find_iter(text)
            .map(|m| Detection::at_bytes(text, m.start(), m.end(), MARKER_ID, score))
            .collect()
    }
}

impl Detector for ConflictAvoidanceDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        let mut detections = self.scan(&self.shift, text, SHIFT_SCORE);
        let minimization = self.scan(&self.minimization, text, PARTIAL_SCORE);
        let deferral = self.scan(&self.deferral, text, PARTIAL_SCORE);

        match (minimization.is_empty(), deferral.is_empty()) {
            (false, false) => detections.push(Detection::summary(
                MARKER_ID,
                COMBINED_SCORE,
                "minimization+defer",
            )),
            (false, true) => detections.extend(minimization),
            (true, false) => detections.extend(deferral),
            (true, true) => {}
        }
        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<Detection> {
        ConflictAvoidanceDetector::try_new().unwrap().detect(text, "de")
    }

    #[test]
    fn test_shift_fires_per_occurrence() {
        insta::assert_debug_snapshot!(detect("Anderes Thema. Egal jetzt."), @r###"
        [
            Detection(CLU_INDIRECT_CONFLICT_AVOIDANCE @ 0..13, conf: 0.70, "Anderes Thema"),
            Detection(CLU_INDIRECT_CONFLICT_AVOIDANCE @ 15..25, conf: 0.70, "Egal jetzt"),
        ]
        "###);
    }

    #[test]
    fn test_minimization_and_deferral_combine() {
        insta::assert_debug_snapshot!(detect("Kein Drama, reden wir später."), @r###"
        [
            Detection(CLU_INDIRECT_CONFLICT_AVOIDANCE, conf: 0.75, "minimization+defer"),
        ]
        "###);
    }

    #[test]
    fn test_minimization_alone() {
        insta::assert_debug_snapshot!(detect("ist nicht so wichtig, halb so wild"), @r###"
        [
            Detection(CLU_INDIRECT_CONFLICT_AVOIDANCE @ 4..20, conf: 0.45, "nicht so wichtig"),
            Detection(CLU_INDIRECT_CONFLICT_AVOIDANCE @ 22..34, conf: 0.45, "halb so wild"),
        ]
        "###);
    }

    #[test]
    fn test_deferral_alone() {
        let found = detect("not now, maybe anderswann");
        let evidence: Vec<_> = found.iter().map(|d| d.evidence.as_str()).collect();
        assert_eq!(evidence, ["not now", "anderswann"]);
        assert!(found.iter().all(|d| d.score == 0.45));
    }

    #[test]
    fn test_shift_plus_combined() {
        let found = detect("Lass gut sein, kein Drama, später");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].score, 0.7);
        assert_eq!(found[1].span, None);
        assert_eq!(found[1].score, 0.75);
    }

    #[test]
    fn test_neither_tier() {
        assert!(detect("Lass uns darüber reden.").is_empty());
    }
}
