//! Hits: the reduced `(message, speaker, marker)` unit used for reasoning
//! across messages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Detection, MarkerLevel, Message, Span};

/// Speaker label of window-level synthetic hits.
pub const WINDOW_SPEAKER: &str = "WINDOW";

/// Speaker label of synthetic hits that cover every participant.
pub const BOTH_SPEAKERS: &str = "BOTH";

/// Span, score and evidence kept from the detection that produced a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitDetail {
    pub span: Option<Span>,
    pub score: f64,
    pub evidence: String,
}

/// A marker occurrence attached to a message.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub message_index: usize,
    pub speaker: String,
    pub marker_id: String,
    /// Present on hits produced by detectors; synthetic hits carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<HitDetail>,
}

impl Hit {
    /// A bare hit without detection detail.
    pub fn new(
        message_index: usize,
        speaker: impl Into<String>,
        marker_id: impl Into<String>,
    ) -> Self {
        Self {
            message_index,
            speaker: speaker.into(),
            marker_id: marker_id.into(),
            detail: None,
        }
    }

    /// Attach a detection produced on `message` as a hit.
    pub fn from_detection(message: &Message, detection: Detection) -> Self {
        Self {
            message_index: message.index,
            speaker: message.speaker.clone(),
            marker_id: detection.label,
            detail: Some(HitDetail {
                span: detection.span,
                score: detection.score,
                evidence: detection.evidence,
            }),
        }
    }

    /// Synthetic hits carry no detection detail.
    pub fn is_synthetic(&self) -> bool {
        self.detail.is_none()
            && (self.speaker == WINDOW_SPEAKER
                || self.speaker == BOTH_SPEAKERS
                || MarkerLevel::from_id(&self.marker_id) == Some(MarkerLevel::Meta))
    }
}

impl fmt::Debug for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hit(#{} {} {})",
            self.message_index, self.speaker, self.marker_id
        )
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.message_index, self.speaker, self.marker_id)
    }
}
