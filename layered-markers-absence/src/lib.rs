//! Windowed, escalation-gated absence inference.
//!
//! Given a transcript and its marker hits, this crate finds windows of active
//! conflict and records which categories of behavior did *not* occur in
//! them:
//!
//! 1. [`segment`] splits the transcript into fixed-size windows
//! 2. [`evaluate_gate`] opens a window when it has enough escalation hits
//!    and enough text
//! 3. [`ResolvedAbsenceSets`] turns configured categories (ids and tags) into
//!    flat marker id sets via the [`TagIndex`]
//! 4. [`emit_for_window`] writes `CONFLICT_CONTEXT` and the
//!    `MEMA_ABSENCE_OF_*` / `MEMA_SPKR_ABSENCE_OF_*` hits
//!
//! [`AbsenceEngine`] drives all of it; [`Pipeline`] adds the detectors in
//! front.

mod absence_set;
mod config;
mod emitter;
mod engine;
mod errors;
mod gate;
mod pipeline;
mod tag_index;
mod window;


pub use absence_set::{AbsenceSet, ResolutionWarning, ResolvedAbsenceSets};
pub use config::{
    AbsenceConfig, AbsencePolicy, AbsenceSetSpec, EscalationSpec, GatingConfig,
    DEFAULT_MIN_E_HITS, DEFAULT_MIN_PARTICIPATION_MSGS, DEFAULT_MIN_TOKENS, DEFAULT_TOLERANT_MAX,
    DEFAULT_WINDOW_MESSAGES,
};
pub use emitter::{
    emit_for_window, qualifying_speakers, speaker_absence_marker, window_absence_marker,
    CONFLICT_CONTEXT,
};
pub use engine::{integrate_absence_detection, AbsenceEngine, WindowReport};
pub use errors::{ConfigError, ConfigResult};
pub use gate::{evaluate_gate, EscalationSet, GateDecision};
pub use pipeline::{Pipeline, PipelineError, PipelineOutput};
pub use tag_index::TagIndex;
pub use window::{segment, Window, WindowSlice};
