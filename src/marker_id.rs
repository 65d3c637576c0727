//! Marker id prefixes and the abstraction level they encode.
//!
//! | Prefix | Level |
//! |--------|-------|
//! | `ATO_` | atomic: single lexical signal |
//! | `SEM_` | semantic: combined signals within a message |
//! | `CLU_` | cluster: recurring structure |
//! | `MEMA_` | meta: inferred over windows of messages |

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Abstraction level of a marker, derived from its id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerLevel {
    Atomic,
    Semantic,
    Cluster,
    Meta,
}

const PREFIXES: &[(&str, MarkerLevel)] = &[
    ("ATO_", MarkerLevel::Atomic),
    ("SEM_", MarkerLevel::Semantic),
    ("CLU_", MarkerLevel::Cluster),
    ("MEMA_", MarkerLevel::Meta),
];

/// Legacy short prefixes and their replacements.
const LEGACY_PREFIXES: &[(&str, &str)] = &[
    ("A_", "ATO_"),
    ("S_", "SEM_"),
    ("C_", "CLU_"),
    ("MM_", "MEMA_"),
];

impl MarkerLevel {
    /// Level encoded by the id prefix, if any.
    pub fn from_id(marker_id: &str) -> Option<Self> {
        PREFIXES
            .iter()
            .find(|(prefix, _)| marker_id.starts_with(prefix))
            .map(|(_, level)| *level)
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            MarkerLevel::Atomic => "ATO_",
            MarkerLevel::Semantic => "SEM_",
            MarkerLevel::Cluster => "CLU_",
            MarkerLevel::Meta => "MEMA_",
        }
    }
}

impl fmt::Display for MarkerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkerLevel::Atomic => "atomic",
            MarkerLevel::Semantic => "semantic",
            MarkerLevel::Cluster => "cluster",
            MarkerLevel::Meta => "meta",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkerIdError {
    #[error("marker id is empty")]
    Empty,
    #[error("marker id '{0}' has no level prefix (ATO_, SEM_, CLU_, MEMA_)")]
    MissingPrefix(String),
}

/// Check that `marker_id` carries one of the level prefixes.
pub fn validate_marker_id(marker_id: &str) -> Result<MarkerLevel, MarkerIdError> {
    if marker_id.is_empty() {
        return Err(MarkerIdError::Empty);
    }
    MarkerLevel::from_id(marker_id).ok_or_else(|| MarkerIdError::MissingPrefix(marker_id.to_string()))
}

/// Rewrite a legacy short prefix (`A_`, `S_`, `C_`, `MM_`) to its current form.
///
/// Ids without a legacy prefix are returned unchanged.
pub fn migrate_marker_id(marker_id: &str) -> String {
    for (old, new) in LEGACY_PREFIXES {
        if let Some(rest) = marker_id.strip_prefix(old) {
            return format!("{}{}", new, rest);
        }
    }
    marker_id.to_string()
}
