#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Core types for conversational marker analysis.
//!
//! A transcript is an ordered list of [`Message`]s. Detectors scan one
//! message at a time and produce [`Detection`]s; attached to their message
//! these become [`Hit`]s, the unit that the absence engine reasons over.
//!
//! ## Crates
//!
//! - `layered-markers` (this crate): messages, detections, hits, marker
//!   records and the [`Detector`] contract
//! - `layered-markers-detectors`: the lexical detectors and their registry
//! - `layered-markers-absence`: windowing, escalation gating and absence
//!   inference
//!
//! ## Usage
//!
//! ```
//! use layered_markers::{Detection, Hit, Message};
//!
//! let message = Message::new(0, "A", "du lügst");
//! let detection = Detection::at_bytes(&message.text, 0, 9, "ATO_DIRECT_ACCUSATION", 0.6);
//! let hit = Hit::from_detection(&message, detection);
//!
//! assert_eq!(hit.marker_id, "ATO_DIRECT_ACCUSATION");
//! assert_eq!(hit.detail.unwrap().span.unwrap().end, 8);
//! ```

mod detection;
mod display;
mod hit;
mod marker_id;
mod message;
mod record;

pub use detection::{
    truncate_evidence, Detection, Detector, Span, DEFAULT_LANGUAGE, EVIDENCE_MAX_CHARS,
};
pub use display::DetectionDisplay;
pub use hit::{Hit, HitDetail, BOTH_SPEAKERS, WINDOW_SPEAKER};
pub use marker_id::{migrate_marker_id, validate_marker_id, MarkerIdError, MarkerLevel};
pub use message::{Message, Transcript, TranscriptError};
pub use record::{MarkerRecord, MarkerRegistryFeed, RegistryFeedError};
