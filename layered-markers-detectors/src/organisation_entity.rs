//! Organisation mentions: legal forms, company vocabulary, domain names.

use layered_markers::{Detection, Detector};

use crate::errors::DetectorResult;
use crate::PatternDetector;

pub const MARKER_ID: &str = "ATO_ORGANISATION_ENTITY";

const LEGAL_FORM: &str = r"(?i)\b(GmbH|UG|AG|HRB)\b";
const COMPANY_WORD: &str = r"(?i)\bFirma\b|\bHolding\b|\bAmtsgericht\b|\bXING\b|\bLinkedIn\b";
const DOMAIN: &str = r"(?i)\b[a-z0-9\-]+\.(de|com|org|io)\b";

#[derive(Debug, Clone)]
pub struct OrganisationEntityDetector {
    inner: PatternDetector,
}

impl OrganisationEntityDetector {
    pub fn try_new() -> DetectorResult<Self> {
        Ok(Self {
            inner: PatternDetector::try_new(MARKER_ID, &[LEGAL_FORM, COMPANY_WORD, DOMAIN], 0.5)?,
        })
    }
}

impl Detector for OrganisationEntityDetector {
    fn marker_id(&self) -> &str {
        MARKER_ID
    }

    fn detect(&self, text: &str, lang: &str) -> Vec<Detection> {
        self.inner.detect(text, lang)
    }
}
