//! Error types for detector construction and registration.

use layered_markers::MarkerIdError;
use thiserror::Error;

/// Errors raised while building or registering detectors.
///
/// All of these happen at setup time. A registered detector never fails
/// while scanning text.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// A lexicon pattern failed to compile.
    #[error("invalid pattern for {marker_id}: {source}")]
    InvalidPattern {
        marker_id: String,
        #[source]
        source: regex::Error,
    },

    /// The detector's marker id has no level prefix.
    #[error(transparent)]
    InvalidMarkerId(#[from] MarkerIdError),

    /// A detector for this marker id is already registered.
    #[error("detector already registered for {0}")]
    DuplicateMarker(String),

    /// No detector is registered for this marker id.
    #[error("no detector registered for {0}")]
    UnknownMarker(String),
}

/// Result type for detector setup.
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Compile `pattern`, attributing failures to `marker_id`.
pub(crate) fn compile(marker_id: &str, pattern: &str) -> DetectorResult<regex::Regex> {
    regex::Regex::new(pattern).map_err(|source| DetectorError::InvalidPattern {
        marker_id: marker_id.to_string(),
        source,
    })
}

/// Compile a case-insensitive alternation of `patterns`.
pub(crate) fn compile_any(marker_id: &str, patterns: &[&str]) -> DetectorResult<regex::Regex> {
    compile(marker_id, &format!("(?i){}", patterns.join("|")))
}
