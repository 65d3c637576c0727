//! Direct second-person accusations ("du lügst", "du manipulierst mich").

use layered_markers::{truncate_evidence, Detection, Detector};

use crate::errors::DetectorResult;
use crate::PatternDetector;

pub const MARKER_ID: &str = "ATO_DIRECT_ACCUSATION";

const ACCUSATION: &str =
    r"(?is)\bdu\b.*\b(lüg|manipulier|betrüg|unterstell|verheimlich|hintergeh)\w*";

/// "du" followed anywhere later by an accusation verb stem.
///
/// The match is greedy and reaches the last accusation verb in the text.
/// Evidence is cut to the first 40 characters of the match.
#[derive(Debug, Clone)]
pub struct DirectAccusationDetector {
    inner: PatternDetector,
}

impl DirectAccusationDetector {
    pub fn try_new() -> DetectorResult<Self> {
        Ok(Self {
            inner: PatternDetector::try_new(MARKER_ID, &[ACCUSATION], 0.6)?,
        })
    }
}

impl Detector for DirectAccusationDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, lang: &str) -> Vec<Detection> {
        self.inner
            .detect(text, lang)
            .into_iter()
            .map(|mut detection| {
                detection.evidence = truncate_evidence(&detection.evidence);
                detection
            })
            .collect()
    }
}
