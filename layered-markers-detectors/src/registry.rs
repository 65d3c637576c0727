//! Registry of detectors keyed by marker id.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use layered_markers::{validate_marker_id, Detection, Detector, Hit, Message};

use crate::errors::{DetectorError, DetectorResult};
use crate::{
    ConflictAvoidanceDetector, DirectAccusationDetector, HighValenceDetector,
    IdealizationDevaluationDetector, LieConcealmentDetector, MirroringRequestDetector,
    OrganisationEntityDetector, RealityShiftDetector, SlangTokenDetector,
    SustainedContactDetector, SvtIncongruenceDetector,
};

pub type BoxedDetector = Box<dyn Detector + Send + Sync>;

/// A detector that panicked on one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorFailure {
    pub marker_id: String,
    pub message_index: usize,
    pub reason: String,
}

/// Hits from running every detector over a transcript, plus any isolated
/// failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub hits: Vec<Hit>,
    pub failures: Vec<DetectorFailure>,
}

/// Detectors in registration order.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<BoxedDetector>,
    by_id: HashMap<String, usize>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in detectors.
    pub fn standard() -> DetectorResult<Self> {
        let mut registry = Self::new();
        registry.register(DirectAccusationDetector::try_new()?)?;
        registry.register(HighValenceDetector::try_new()?)?;
        registry.register(OrganisationEntityDetector::try_new()?)?;
        registry.register(RealityShiftDetector::try_new()?)?;
        registry.register(SlangTokenDetector::try_new()?)?;
        registry.register(ConflictAvoidanceDetector::try_new()?)?;
        registry.register(SustainedContactDetector::try_new()?)?;
        registry.register(SvtIncongruenceDetector::try_new()?)?;
        registry.register(IdealizationDevaluationDetector::try_new()?)?;
        registry.register(LieConcealmentDetector::try_new()?)?;
        registry.register(MirroringRequestDetector::try_new()?)?;
        Ok(registry)
    }

    pub fn register<D>(&mut self, detector: D) -> DetectorResult<()>
    where
        D: Detector + Send + Sync + 'static,
    {
        self.register_boxed(Box::new(detector))
    }

    /// Add a detector. Its marker id must carry a level prefix and must not
    /// be registered yet.
    pub fn register_boxed(&mut self, detector: BoxedDetector) -> DetectorResult<()> {
        let marker_id = detector.marker_id().to_string();
        validate_marker_id(&marker_id)?;
        if self.by_id.contains_key(&marker_id) {
            return Err(DetectorError::DuplicateMarker(marker_id));
        }
        self.by_id.insert(marker_id, self.detectors.len());
        self.detectors.push(detector);
        Ok(())
    }

    pub fn get(&self, marker_id: &str) -> Option<&(dyn Detector + Send + Sync)> {
        self.by_id
            .get(marker_id)
            .map(|&idx| self.detectors[idx].as_ref())
    }

    pub fn contains(&self, marker_id: &str) -> bool {
        self.by_id.contains_key(marker_id)
    }

    /// Marker ids in registration order.
    pub fn marker_ids(&self) -> impl Iterator<Item = &str> {
        self.detectors.iter().map(|d| d.marker_id())
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run the detector registered for `marker_id` over one text.
    pub fn detect(&self, marker_id: &str, text: &str, lang: &str) -> DetectorResult<Vec<Detection>> {
        self.get(marker_id)
            .map(|detector| detector.detect(text, lang))
            .ok_or_else(|| DetectorError::UnknownMarker(marker_id.to_string()))
    }

    /// Run every detector over every message.
    ///
    /// Hits are ordered by message, then registration order, then detection
    /// order. A detector that panics loses its output for that message only.
    pub fn annotate(&self, messages: &[Message], lang: &str) -> Annotation {
        let mut annotation = Annotation::default();

        for message in messages {
            for detector in &self.detectors {
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| detector.detect(&message.text, lang)));
                match outcome {
                    Ok(detections) => annotation.hits.extend(
                        detections
                            .into_iter()
                            .map(|detection| Hit::from_detection(message, detection)),
                    ),
                    Err(payload) => {
                        let reason = panic_reason(payload.as_ref());
                        tracing::warn!(
                            marker_id = detector.marker_id(),
                            message_index = message.index,
                            reason = %reason,
                            "detector failed, skipping its output for this message"
                        );
                        annotation.failures.push(DetectorFailure {
                            marker_id: detector.marker_id().to_string(),
                            message_index: message.index,
                            reason,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            messages = messages.len(),
            hits = annotation.hits.len(),
            failures = annotation.failures.len(),
            "annotated transcript"
        );
        annotation
    }
}

impl fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.marker_ids()).finish()
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "detector panicked".to_string()
    }
}
