//! Claiming rare contact while describing a standing routine.

use layered_markers::{Detection, Detector};
use regex::Regex;

use crate::errors::{compile, DetectorResult};

pub const MARKER_ID: &str = "CLU_SVT_MESSAGE_INCONGRUENCE";

const RARITY_CLAIM: &str =
    r"(?i)(selten|kaum|1[\-–]2\s*[x×/]\s*monat|einmal\s+im\s+monat|rarely|seldom)";
const RITUAL: &str = r"(?i)(wie\s+üblich|wie\s+immer|fix|vereinbart|wöchentlich|regelmäßig|morgen|nächste\s*woche|call|termin|meeting)";

const MIN_RITUALS: usize = 2;

#[derive(Debug, Clone)]
pub struct SvtIncongruenceDetector {
    claim: Regex,
    ritual: Regex,
}

impl SvtIncongruenceDetector {
    pub fn try_new() -> DetectorResult<Self> {
        Ok(Self {
            claim: compile(MARKER_ID, RARITY_CLAIM)?,
            ritual: compile(MARKER_ID, RITUAL)?,
        })
    }
}

impl Detector for SvtIncongruenceDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, _lang: &str) -> Vec<Detection> {
        if self.claim.is_match(text) && self.ritual.find_iter(text).count() >= MIN_RITUALS {
            vec![Detection::summary(MARKER_ID, 0.9, "claim+>=2 ritual signals")]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<Detection> {
        SvtIncongruenceDetector::try_new().unwrap().detect(text, "de")
    }

    #[test]
    fn test_claim_with_rituals() {
        insta::assert_debug_snapshot!(
            detect("Wir sehen uns kaum, nur der Call wie immer und morgen ein Termin"),
            @r###"
        [
            Detection(CLU_SVT_MESSAGE_INCONGRUENCE, conf: 0.90, "claim+>=2 ritual signals"),
        ]
        "###
        );
    }

    #[test]
    fn test_needs_both_parts() {
        assert!(detect("wir telefonieren selten, vielleicht morgen").is_empty());
        assert!(detect("Call morgen, Termin fix").is_empty());
        assert_eq!(detect("1-2x Monat, call und meeting").len(), 1);
    }
}
