//! Lexical marker detectors for layered-markers.
//!
//! Each detector implements [`layered_markers::Detector`] for one marker id.
//! Patterns are compiled in `try_new`, so an invalid lexicon surfaces as a
//! [`DetectorError`] at setup and `detect` itself cannot fail.
//!
//! | Marker id | Detector |
//! |-----------|----------|
//! | `ATO_DIRECT_ACCUSATION` | [`DirectAccusationDetector`] |
//! | `ATO_EMO_HIGH_VALENCE_MARKER` | [`HighValenceDetector`] |
//! | `ATO_ORGANISATION_ENTITY` | [`OrganisationEntityDetector`] |
//! | `ATO_REALITY_SHIFT` | [`RealityShiftDetector`] |
//! | `ATO_SLANG_TOKEN` | [`SlangTokenDetector`] |
//! | `CLU_INDIRECT_CONFLICT_AVOIDANCE` | [`ConflictAvoidanceDetector`] |
//! | `CLU_SUSTAINED_CONTACT` | [`SustainedContactDetector`] |
//! | `CLU_SVT_MESSAGE_INCONGRUENCE` | [`SvtIncongruenceDetector`] |
//! | `SEM_IDEALIZATION_DEVALUATION` | [`IdealizationDevaluationDetector`] |
//! | `SEM_LIE_CONCEALMENT` | [`LieConcealmentDetector`] |
//! | `SEM_MIRRORING_REQUEST` | [`MirroringRequestDetector`] |
//!
//! ## Usage
//!
//! ```
//! use layered_markers::Message;
//! use layered_markers_detectors::DetectorRegistry;
//!
//! let registry = DetectorRegistry::standard().unwrap();
//! let messages = vec![Message::new(0, "A", "du lügst und manipulierst")];
//! let annotation = registry.annotate(&messages, "de");
//!
//! assert_eq!(annotation.hits[0].marker_id, "ATO_DIRECT_ACCUSATION");
//! ```

mod conflict_avoidance;
mod direct_accusation;
mod errors;
mod high_valence;
mod idealization_devaluation;
mod lie_concealment;
mod mirroring_request;
mod organisation_entity;
mod pattern;
mod reality_shift;
mod registry;
pub mod scoring;
mod slang_token;
mod sustained_contact;
mod svt_incongruence;


pub use conflict_avoidance::ConflictAvoidanceDetector;
pub use direct_accusation::DirectAccusationDetector;
pub use errors::{DetectorError, DetectorResult};
pub use high_valence::HighValenceDetector;
pub use idealization_devaluation::IdealizationDevaluationDetector;
pub use lie_concealment::LieConcealmentDetector;
pub use mirroring_request::MirroringRequestDetector;
pub use organisation_entity::OrganisationEntityDetector;
pub use pattern::PatternDetector;
pub use reality_shift::RealityShiftDetector;
pub use registry::{Annotation, BoxedDetector, DetectorFailure, DetectorRegistry};
pub use slang_token::SlangTokenDetector;
pub use sustained_contact::SustainedContactDetector;
pub use svt_incongruence::SvtIncongruenceDetector;

/// Marker ids of the built-in detectors.
pub mod marker_ids {
    pub use crate::conflict_avoidance::MARKER_ID as INDIRECT_CONFLICT_AVOIDANCE;
    pub use crate::direct_accusation::MARKER_ID as DIRECT_ACCUSATION;
    pub use crate::high_valence::MARKER_ID as HIGH_VALENCE;
    pub use crate::idealization_devaluation::MARKER_ID as IDEALIZATION_DEVALUATION;
    pub use crate::lie_concealment::MARKER_ID as LIE_CONCEALMENT;
    pub use crate::mirroring_request::MARKER_ID as MIRRORING_REQUEST;
    pub use crate::organisation_entity::MARKER_ID as ORGANISATION_ENTITY;
    pub use crate::reality_shift::MARKER_ID as REALITY_SHIFT;
    pub use crate::slang_token::MARKER_ID as SLANG_TOKEN;
    pub use crate::sustained_contact::MARKER_ID as SUSTAINED_CONTACT;
    pub use crate::svt_incongruence::MARKER_ID as SVT_MESSAGE_INCONGRUENCE;
}
