//! End-to-end run: detectors over a transcript, then absence inference.
//!
//! ```
//! use layered_markers::{MarkerRecord, Transcript};
//! use layered_markers_absence::{AbsenceConfig, Pipeline};
//!
//! let config = AbsenceConfig::from_toml_str(r#"
//! [gating_conflict]
//! min_E_hits = 1
//! context_markers_by_tag = ["escalation"]
//!
//! [policy]
//! min_tokens = 3
//!
//! [absence_sets.threat]
//! tags = ["threat"]
//! "#).unwrap();
//! let records = vec![MarkerRecord::new("ATO_DIRECT_ACCUSATION", ["escalation"])];
//!
//! let pipeline = Pipeline::standard(&config, &records).unwrap();
//! let transcript = Transcript::from_texts([("A", "du lügst"), ("B", "nein, gar nicht")]);
//! let output = pipeline.run(&transcript);
//!
//! assert!(output.hits.iter().any(|h| h.marker_id == "CONFLICT_CONTEXT"));
//! ```

use thiserror::Error;

use layered_markers::{Hit, MarkerRecord, Transcript, DEFAULT_LANGUAGE};
use layered_markers_detectors::{DetectorError, DetectorFailure, DetectorRegistry};

use crate::engine::{AbsenceEngine, WindowReport};
use crate::errors::ConfigError;
use crate::{AbsenceConfig, TagIndex};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Detector hits followed by synthetic hits
    pub hits: Vec<Hit>,
    pub windows: Vec<WindowReport>,
    pub detector_failures: Vec<DetectorFailure>,
}

impl PipelineOutput {
    pub fn synthetic_hits(&self) -> impl Iterator<Item = &Hit> {
        self.windows.iter().flat_map(|report| report.synthetic.iter())
    }

    pub fn open_windows(&self) -> usize {
        self.windows.iter().filter(|report| report.gate.open).count()
    }
}

/// A detector registry paired with an absence engine.
#[derive(Debug)]
pub struct Pipeline {
    registry: DetectorRegistry,
    engine: AbsenceEngine,
    lang: String,
}

impl Pipeline {
    pub fn new(registry: DetectorRegistry, engine: AbsenceEngine) -> Self {
        Self {
            registry,
            engine,
            lang: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// All built-in detectors and an engine resolved against `records`.
    pub fn standard(config: &AbsenceConfig, records: &[MarkerRecord]) -> Result<Self, PipelineError> {
        let registry = DetectorRegistry::standard()?;
        let index = TagIndex::build(records);
        let engine = AbsenceEngine::new(config, &index)?;
        Ok(Self::new(registry, engine))
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &AbsenceEngine {
        &self.engine
    }

    pub fn run(&self, transcript: &Transcript) -> PipelineOutput {
        let messages = transcript.messages();
        let annotation = self.registry.annotate(messages, &self.lang);
        let windows = self.engine.evaluate(messages, &annotation.hits);

        let mut hits = annotation.hits;
        hits.extend(windows.iter().flat_map(|report| report.synthetic.iter().cloned()));

        tracing::debug!(
            messages = messages.len(),
            hits = hits.len(),
            windows = windows.len(),
            failures = annotation.failures.len(),
            "pipeline run"
        );

        PipelineOutput {
            hits,
            windows,
            detector_failures: annotation.failures,
        }
    }
}
