//! Raw detector output and the [`Detector`] contract.
//!
//! Detections are produced per message and carry character offsets into the
//! message text. Offsets count `char`s, not bytes, so "lügst" spans 5 units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default language passed to detectors when none is given.
pub const DEFAULT_LANGUAGE: &str = "de";

/// Maximum number of characters kept in evidence snippets.
pub const EVIDENCE_MAX_CHARS: usize = 40;

/// Half-open character range `[start, end)` into a message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Convert a byte range (as reported by `regex`) into a character span.
    pub fn from_byte_range(text: &str, start: usize, end: usize) -> Self {
        let start_chars = text[..start].chars().count();
        let len_chars = text[start..end].chars().count();
        Self::new(start_chars, start_chars + len_chars)
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A single scored hit produced by a detector for one message.
///
/// The score is clamped into `[0, 1]` on construction.
#[derive(Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Character span of the evidence, `None` for consolidated summary hits
    pub span: Option<Span>,
    /// Marker id of the producing detector
    pub label: String,
    /// Confidence score from 0.0 to 1.0
    pub score: f64,
    /// Short evidence snippet
    pub evidence: String,
}

impl Detection {
    pub fn new(
        span: Option<Span>,
        label: impl Into<String>,
        score: f64,
        evidence: impl Into<String>,
    ) -> Self {
        Self {
            span,
            label: label.into(),
            score: score.clamp(0.0, 1.0),
            evidence: evidence.into(),
        }
    }

    /// A detection covering a byte range reported by a regex match. The
    /// matched text becomes the evidence.
    pub fn at_bytes(text: &str, start: usize, end: usize, label: &str, score: f64) -> Self {
        Self::new(
            Some(Span::from_byte_range(text, start, end)),
            label,
            score,
            &text[start..end],
        )
    }

    /// A consolidated detection without a span.
    pub fn summary(label: &str, score: f64, evidence: impl Into<String>) -> Self {
        Self::new(None, label, score, evidence)
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score.clamp(0.0, 1.0);
        self
    }
}

impl fmt::Debug for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Compact format for snapshot tests: Detection(LABEL @ 0..5, conf: 0.60, "ev")
        match self.span {
            Some(span) => write!(
                f,
                "Detection({} @ {}, conf: {:.2}, {:?})",
                self.label, span, self.score, self.evidence
            ),
            None => write!(
                f,
                "Detection({}, conf: {:.2}, {:?})",
                self.label, self.score, self.evidence
            ),
        }
    }
}

impl PartialEq for Detection {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span
            && self.label == other.label
            && (self.score - other.score).abs() < 1e-9
            && self.evidence == other.evidence
    }
}

/// Cut an evidence snippet down to [`EVIDENCE_MAX_CHARS`] characters.
pub fn truncate_evidence(text: &str) -> String {
    text.chars().take(EVIDENCE_MAX_CHARS).collect()
}

/// A per-marker pattern matcher.
///
/// Implementations are pure: identical `(text, lang)` input always yields an
/// identical sequence. Any fallible setup (pattern compilation) belongs in the
/// constructor, so `detect` never fails.
pub trait Detector {
    /// The marker id this detector labels its output with.
    fn marker_id(&self) -> &str;

    /// Scan one message text.
    fn detect(&self, text: &str, lang: &str) -> Vec<Detection>;
}
