//! High emotional valence: exclamation runs, shouting, intensifiers.

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile, DetectorResult};
use crate::scoring::{capped, Staircase};

pub const MARKER_ID: &str = "ATO_EMO_HIGH_VALENCE_MARKER";

/// Evidence detections kept per signal kind
const MAX_EVIDENCE_PER_KIND: usize = 4;

const SINGLE_SIGNAL_SCORE: f64 = 0.4;
const EVIDENCE_CEILING: f64 = 0.5;
const STAIRS: Staircase = Staircase::new(0.7, 0.05, 0.95).offset(2).cap(5);

/// Counts three signal kinds and emits a span-less summary
/// (`signals=<n>`) followed by per-kind evidence detections.
#[derive(Debug, Clone)]
pub struct HighValenceDetector {
    exclamation: Regex,
    all_caps: Regex,
    intensifier: Regex,
}

impl HighValenceDetector {
    pub fn try_new() -> DetectorResult<Self> {
        Ok(Self {
            exclamation: compile(MARKER_ID, r"!{2,}")?,
            all_caps: compile(MARKER_ID, r"[A-ZÄÖÜ]{3,}")?,
            intensifier: compile(
                MARKER_ID,
                r"(?i)\b(extrem|unglaublich|absolut|vollkommen|mega|heftig)\b",
            )?,
        })
    }

    fn matches(&self, regex: &Regex, text: &str) -> Vec<Detection> {
        regex
            .find_iter(text)
            .map(|m| Detection::at_bytes(text, m.start(), m.end(), MARKER_ID, 0.0))
            .collect()
    }
}

impl Detector for HighValenceDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        let exclamations = self.matches(&self.exclamation, text);
        let caps = self.matches(&self.all_caps, text);
        let intensifiers = self.matches(&self.intensifier, text);

        let signals = exclamations.len() + caps.len() + intensifiers.len();
        if signals == 0 {
            return Vec::new();
        }

        let score = if signals == 1 {
            SINGLE_SIGNAL_SCORE
        } else {
            STAIRS.score(signals)
        };
        let evidence_score = score.min(EVIDENCE_CEILING);

        let mut detections = vec![Detection::summary(
            MARKER_ID,
            score,
            format!("signals={}", signals),
        )];
        for kind in [exclamations, caps, intensifiers] {
            detections.extend(capped(kind, MAX_EVIDENCE_PER_KIND, evidence_score));
        }
        detections
    }
}
