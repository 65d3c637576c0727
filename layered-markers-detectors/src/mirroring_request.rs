//! Requests to name, mirror or state feelings and intentions openly.

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile_any, DetectorResult};
use crate::scoring::Staircase;

pub const MARKER_ID: &str = "SEM_MIRRORING_REQUEST";

const PROMPTS: &[&str] = &[
    r"\bbenenn(e|st)?\b",
    r"\bspiegle?\b",
    r"sag\s+mir,\s*was\s+du\s+(willst|fühlst|denkst)\b",
    r"kannst\s+du\s+das\s+klar\s+sagen\?",
    r"\btell\s+me\s+what\s+you\s+(want|feel|think)\b",
    r"\bname\s+it\b",
    r"\bbe\s+transparent\b",
];

const SINGLE_PROMPT_SCORE: f64 = 0.5;
const STAIRS: Staircase = Staircase::new(0.4, 0.15, 0.9).cap(4);

#[derive(Debug, Clone)]
pub struct MirroringRequestDetector {
    prompts: Regex,
}

impl MirroringRequestDetector {
    pub fn try_new() -> DetectorResult<Self> {
        Ok(Self {
            prompts: compile_any(MARKER_ID, PROMPTS)?,
        })
    }
}

impl Detector for MirroringRequestDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        let matches: Vec<_> = self.prompts.find_iter(text).collect();
        let score = match matches.len() {
            0 => return Vec::new(),
            1 => SINGLE_PROMPT_SCORE,
            n => STAIRS.score(n),
        };
        matches
            .into_iter()
            .map(|m| Detection::at_bytes(text, m.start(), m.end(), MARKER_ID, score))
            .collect()
    }
}
