//! Resolution of named absence categories into flat marker id sets.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::AbsenceSetSpec;
use crate::errors::{ConfigError, ConfigResult};
use crate::TagIndex;

/// One absence category with its resolved marker ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceSet {
    pub name: String,
    pub ids: BTreeSet<String>,
}

impl AbsenceSet {
    /// How many of `marker_ids` belong to this category.
    pub fn count_present<'h, I>(&self, marker_ids: I) -> usize
    where
        I: IntoIterator<Item = &'h str>,
    {
        marker_ids
            .into_iter()
            .filter(|marker_id| self.ids.contains(*marker_id))
            .count()
    }
}

/// Non-fatal findings from resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
    /// A configured tag matches no marker.
    UnknownTag { set: String, tag: String },
    /// A category resolved to no ids; it passes `StrictZero` in every window.
    EmptySet { set: String },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::UnknownTag { set, tag } => {
                write!(f, "absence set '{}': tag '{}' matches no markers", set, tag)
            }
            ResolutionWarning::EmptySet { set } => {
                write!(f, "absence set '{}' resolves to no marker ids", set)
            }
        }
    }
}

/// All categories in declaration order, resolved once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAbsenceSets {
    sets: Vec<AbsenceSet>,
    warnings: Vec<ResolutionWarning>,
}

impl ResolvedAbsenceSets {
    /// `ids ∪ ⋃ tag_to_ids[tag]` for each category.
    ///
    /// With `reject_empty` set, a category that resolves to nothing is a
    /// [`ConfigError::EmptyAbsenceSet`]; otherwise it is kept and reported as
    /// a warning.
    pub fn resolve(
        specs: &[AbsenceSetSpec],
        index: &TagIndex,
        reject_empty: bool,
    ) -> ConfigResult<Self> {
        let mut sets = Vec::with_capacity(specs.len());
        let mut warnings = Vec::new();

        for spec in specs {
            let mut ids: BTreeSet<String> = spec.ids.iter().cloned().collect();
            for tag in &spec.tags {
                match index.ids_for_tag(tag) {
                    Some(tagged) => ids.extend(tagged.iter().cloned()),
                    None => warnings.push(ResolutionWarning::UnknownTag {
                        set: spec.name.clone(),
                        tag: tag.clone(),
                    }),
                }
            }

            if ids.is_empty() {
                if reject_empty {
                    return Err(ConfigError::EmptyAbsenceSet(spec.name.clone()));
                }
                warnings.push(ResolutionWarning::EmptySet {
                    set: spec.name.clone(),
                });
            }

            sets.push(AbsenceSet {
                name: spec.name.clone(),
                ids,
            });
        }

        for warning in &warnings {
            tracing::warn!(%warning, "absence set resolution");
        }

        Ok(Self { sets, warnings })
    }

    pub fn sets(&self) -> &[AbsenceSet] {
        &self.sets
    }

    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    pub fn get(&self, name: &str) -> Option<&AbsenceSet> {
        self.sets.iter().find(|set| set.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AbsenceSet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
