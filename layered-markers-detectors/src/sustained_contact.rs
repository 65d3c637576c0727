//! Signals of an ongoing, scheduled relationship: routines, time anchors,
//! calls and meetings.

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile_any, DetectorResult};
use crate::scoring::{capped, Staircase};

pub const MARKER_ID: &str = "CLU_SUSTAINED_CONTACT";

const ROUTINE: &[&str] = &[
    r"\bimmer\b",
    r"\bjeden(s)?\b",
    r"\bregelmäßig\b",
    r"\bwöchentlich\b",
    r"\btäglich\b",
    r"\bwie\s+besprochen\b",
    r"\bwie\s+üblich\b",
    r"\bfix\b",
    r"\bvereinbart\b",
];
const TIME_ANCHOR: &[&str] = &[
    r"\bmontags?\b",
    r"\bdienstags?\b",
    r"\bmittwochs?\b",
    r"\bdonnerstags?\b",
    r"\bfreitags?\b",
    r"\bsamstags?\b",
    r"\bsonntags?\b",
    r"\bmorgen\b",
    r"\bnächste\s*woche\b",
    r"\bübermorgen\b",
    r"\b\d{1,2}[:.]\d{2}\b",
    r"\b20\s*Uhr\b",
    r"\bpm\b",
    r"\bam\b",
];
const CALL_WORD: &[&str] = &[
    r"\bcall\b",
    r"\btermin\b",
    r"\bmeeting\b",
    r"\bslot\b",
    r"\bcheck\-in\b",
];

const MAX_EVIDENCE: usize = 6;
const SUMMARY_FLOOR: f64 = 0.5;
const SUMMARY_STAIRS: Staircase = Staircase::new(0.45, 0.15, 0.95).cap(4);
const EVIDENCE_STAIRS: Staircase = Staircase::new(0.3, 0.05, 0.5);

/// Emits a `density:<n>` summary when there are at least two signals, or one
/// signal alongside a time anchor. Up to six evidence detections follow
/// whenever anything matched.
#[derive(Debug, Clone)]
pub struct SustainedContactDetector {
    any_signal: Regex,
    time_anchor: Regex,
}

impl SustainedContactDetector {
    pub fn try_new() -> DetectorResult<Self> {
        let all: Vec<&str> = ROUTINE
            .iter()
            .chain(TIME_ANCHOR)
            .chain(CALL_WORD)
            .copied()
            .collect();
        Ok(Self {
            any_signal: compile_any(MARKER_ID, &all)?,
            time_anchor: compile_any(MARKER_ID, TIME_ANCHOR)?,
        })
    }
}

impl Detector for SustainedContactDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        let matches: Vec<Detection> = self
            .any_signal
            .find_iter(text)
            .map(|m| Detection::at_bytes(text, m.start(), m.end(), MARKER_ID, 0.0))
            .collect();
        if matches.is_empty() {
            return Vec::new();
        }

        let count = matches.len();
        let has_time = self.time_anchor.is_match(text);

        let mut detections = Vec::new();
        if count >= 2 || has_time {
            let score = SUMMARY_STAIRS.score(count).max(SUMMARY_FLOOR);
            detections.push(Detection::summary(
                MARKER_ID,
                score,
                format!("density:{}", count),
            ));
        }
        detections.extend(capped(matches, MAX_EVIDENCE, EVIDENCE_STAIRS.score(count)));
        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<Detection> {
        SustainedContactDetector::try_new().unwrap().detect(text, "de")
    }

    #[test]
    fn test_routine_with_time_anchor() {
        insta::assert_debug_snapshot!(detect("wie üblich montags um 20 Uhr"), @r###"
        [
            Detection(CLU_SUSTAINED_CONTACT, conf: 0.90, "density:3"),
            Detection(CLU_SUSTAINED_CONTACT @ 0..10, conf: 0.45, "wie üblich"),
            Detection(CLU_SUSTAINED_CONTACT @ 11..18, conf: 0.45, "montags"),
            Detection(CLU_SUSTAINED_CONTACT @ 22..28, conf: 0.45, "20 Uhr"),
        ]
        "###);
    }

    #[test]
    fn test_single_time_anchor_is_enough() {
        let found = detect("bis morgen");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].evidence, "density:1");
        assert!((found[0].score - 0.6).abs() < 1e-9);
        assert!((found[1].score - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_single_routine_word_gives_evidence_only() {
        let found = detect("das ist fix");
        assert_eq!(found.len(), 1);
        assert!(found[0].span.is_some());
    }

    #[test]
    fn test_evidence_is_capped() {
        let found = detect("call termin meeting slot call termin meeting slot");
        assert_eq!(found[0].evidence, "density:8");
        assert!((found[0].score - 0.95).abs() < 1e-9);
        assert_eq!(found.len(), 1 + 6);
        assert!(found[1..].iter().all(|d| d.score == 0.5));
    }
}
