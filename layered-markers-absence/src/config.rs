//! Engine configuration and its TOML loader.
//!
//! ```toml
//! [window]
//! messages = 30
//!
//! [gating_conflict]
//! min_E_hits = 3
//! context_markers_by_tag = ["escalation"]
//!
//! [escalation]
//! ids = ["ATO_DIRECT_ACCUSATION"]
//!
//! [policy]
//! strict_zero = true
//! tolerant_max = 1
//! min_tokens = 200
//!
//! [meta]
//! min_participation_msgs = 2
//!
//! [emit]
//! per_speaker = true
//!
//! [absence_sets.threat]
//! ids = ["DIRECT_THREAT"]
//! tags = ["threat"]
//! ```
//!
//! Decoding is lenient per field: a missing or malformed value falls back
//! to its default (with a warning for malformed ones). Only unreadable files
//! and invalid TOML syntax are errors.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::errors::{ConfigError, ConfigResult};

pub const DEFAULT_WINDOW_MESSAGES: usize = 30;
pub const DEFAULT_MIN_E_HITS: usize = 3;
pub const DEFAULT_MIN_TOKENS: usize = 200;
pub const DEFAULT_TOLERANT_MAX: usize = 1;
pub const DEFAULT_MIN_PARTICIPATION_MSGS: usize = 2;

/// How many hits of an absence category a window may contain and still
/// count the category as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsencePolicy {
    /// No hits at all
    StrictZero,
    /// At most `max` hits
    Tolerant { max: usize },
}

impl AbsencePolicy {
    pub fn passes(&self, present: usize) -> bool {
        match *self {
            AbsencePolicy::StrictZero => present == 0,
            AbsencePolicy::Tolerant { max } => present <= max,
        }
    }
}

impl Default for AbsencePolicy {
    fn default() -> Self {
        AbsencePolicy::StrictZero
    }
}

/// Window, gate and emission settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatingConfig {
    /// Messages per window
    pub window_size: usize,
    /// Escalation hits required to open the gate
    pub min_e_hits: usize,
    /// Whitespace tokens required to open the gate
    pub min_tokens: usize,
    pub policy: AbsencePolicy,
    /// Messages a speaker needs in a window to be judged individually
    pub min_participation_msgs: usize,
    pub per_speaker: bool,
    pub per_window: bool,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_MESSAGES,
            min_e_hits: DEFAULT_MIN_E_HITS,
            min_tokens: DEFAULT_MIN_TOKENS,
            policy: AbsencePolicy::StrictZero,
            min_participation_msgs: DEFAULT_MIN_PARTICIPATION_MSGS,
            per_speaker: true,
            per_window: true,
        }
    }
}

/// A named absence category before resolution: explicit ids plus tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceSetSpec {
    pub name: String,
    pub ids: Vec<String>,
    pub tags: Vec<String>,
}

impl AbsenceSetSpec {
    pub fn new<I, T, J, U>(name: impl Into<String>, ids: I, tags: J) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
        J: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self {
            name: name.into(),
            ids: ids.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// Marker ids that count as escalation, given directly or by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationSpec {
    pub ids: Vec<String>,
    pub tags: Vec<String>,
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceConfig {
    pub gating: GatingConfig,
    pub escalation: EscalationSpec,
    /// Categories in declaration order
    pub absence_sets: Vec<AbsenceSetSpec>,
    /// Fail resolution when a category resolves to no ids
    pub reject_empty_sets: bool,
}

impl AbsenceConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let table: Table = toml::from_str(input)?;
        Ok(Self::from_table(&table))
    }

    /// Decode an already parsed table. Never fails.
    pub fn from_table(table: &Table) -> Self {
        let window = section(table, "window");
        let gating_conflict = section(table, "gating_conflict");
        let policy = section(table, "policy");
        let meta = section(table, "meta");
        let emit = section(table, "emit");
        let escalation = section(table, "escalation");

        let mut window_size = read_count(window, "window.messages", "messages", DEFAULT_WINDOW_MESSAGES);
        if window_size == 0 {
            tracing::warn!(
                field = "window.messages",
                default = DEFAULT_WINDOW_MESSAGES,
                "window size must be positive, using default"
            );
            window_size = DEFAULT_WINDOW_MESSAGES;
        }

        let strict_zero = read_flag(policy, "policy.strict_zero", "strict_zero", true);
        let tolerant_max = read_count(policy, "policy.tolerant_max", "tolerant_max", DEFAULT_TOLERANT_MAX);

        let gating = GatingConfig {
            window_size,
            min_e_hits: read_count(
                gating_conflict,
                "gating_conflict.min_E_hits",
                "min_E_hits",
                DEFAULT_MIN_E_HITS,
            ),
            min_tokens: read_count(policy, "policy.min_tokens", "min_tokens", DEFAULT_MIN_TOKENS),
            policy: if strict_zero {
                AbsencePolicy::StrictZero
            } else {
                AbsencePolicy::Tolerant { max: tolerant_max }
            },
            min_participation_msgs: min_participation(meta, policy),
            per_speaker: read_flag(emit, "emit.per_speaker", "per_speaker", true),
            per_window: read_flag(emit, "emit.per_window", "per_window", true),
        };

        Self {
            gating,
            escalation: EscalationSpec {
                ids: read_strings(escalation, "escalation.ids", "ids"),
                tags: read_strings(
                    gating_conflict,
                    "gating_conflict.context_markers_by_tag",
                    "context_markers_by_tag",
                ),
            },
            absence_sets: read_absence_sets(table),
            reject_empty_sets: read_flag(policy, "policy.reject_empty_sets", "reject_empty_sets", false),
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.gating.window_size = window_size;
        self
    }

    pub fn with_min_e_hits(mut self, min_e_hits: usize) -> Self {
        self.gating.min_e_hits = min_e_hits;
        self
    }

    pub fn with_min_tokens(mut self, min_tokens: usize) -> Self {
        self.gating.min_tokens = min_tokens;
        self
    }

    pub fn with_policy(mut self, policy: AbsencePolicy) -> Self {
        self.gating.policy = policy;
        self
    }

    pub fn with_min_participation(mut self, min_participation_msgs: usize) -> Self {
        self.gating.min_participation_msgs = min_participation_msgs;
        self
    }

    pub fn with_per_speaker(mut self, per_speaker: bool) -> Self {
        self.gating.per_speaker = per_speaker;
        self
    }

    pub fn with_escalation_ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.escalation.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_absence_set(mut self, spec: AbsenceSetSpec) -> Self {
        self.absence_sets.push(spec);
        self
    }
}

// ============================================================================
// Lenient field decoding
// ============================================================================

fn section<'a>(table: &'a Table, name: &str) -> Option<&'a Table> {
    match table.get(name) {
        Some(Value::Table(inner)) => Some(inner),
        Some(other) => {
            tracing::warn!(
                section = name,
                found = other.type_str(),
                "config section is not a table, using defaults"
            );
            None
        }
        None => None,
    }
}

fn as_count(value: &Value) -> Option<usize> {
    match value {
        Value::Integer(i) => usize::try_from(*i).ok(),
        Value::Float(f) if f.is_finite() && *f >= 0.0 => Some(f.trunc() as usize),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        Value::Boolean(b) => Some(usize::from(*b)),
        _ => None,
    }
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn read_count(section: Option<&Table>, field: &str, key: &str, default: usize) -> usize {
    match section.and_then(|s| s.get(key)) {
        None => default,
        Some(value) => as_count(value).unwrap_or_else(|| {
            tracing::warn!(field, value = %value, default, "malformed count, using default");
            default
        }),
    }
}

fn read_flag(section: Option<&Table>, field: &str, key: &str, default: bool) -> bool {
    match section.and_then(|s| s.get(key)) {
        None => default,
        Some(value) => as_flag(value).unwrap_or_else(|| {
            tracing::warn!(field, value = %value, default, "malformed flag, using default");
            default
        }),
    }
}

/// `meta.min_participation_msgs`, then `policy.min_participation_msgs`,
/// then the default. A malformed value falls through to the next source.
fn min_participation(meta: Option<&Table>, policy: Option<&Table>) -> usize {
    let sources = [
        (meta, "meta.min_participation_msgs"),
        (policy, "policy.min_participation_msgs"),
    ];
    for (section, field) in sources {
        if let Some(value) = section.and_then(|s| s.get("min_participation_msgs")) {
            match as_count(value) {
                Some(count) => return count,
                None => tracing::warn!(field, value = %value, "malformed count, trying next source"),
            }
        }
    }
    DEFAULT_MIN_PARTICIPATION_MSGS
}

/// A string list; a bare string counts as a one-element list.
fn read_strings(section: Option<&Table>, field: &str, key: &str) -> Vec<String> {
    match section.and_then(|s| s.get(key)) {
        None => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    tracing::warn!(field, value = %other, "ignoring non-string entry");
                    None
                }
            })
            .collect(),
        Some(other) => {
            tracing::warn!(field, found = other.type_str(), "expected a list of strings");
            Vec::new()
        }
    }
}

fn read_absence_sets(table: &Table) -> Vec<AbsenceSetSpec> {
    let Some(sets) = section(table, "absence_sets") else {
        return Vec::new();
    };

    sets.iter()
        .filter_map(|(name, entry)| match entry {
            Value::Table(entry) => {
                let ids_field = format!("absence_sets.{}.ids", name);
                let tags_field = format!("absence_sets.{}.tags", name);
                Some(AbsenceSetSpec {
                    name: name.clone(),
                    ids: read_strings(Some(entry), &ids_field, "ids"),
                    tags: read_strings(Some(entry), &tags_field, "tags"),
                })
            }
            other => {
                tracing::warn!(
                    absence_set = %name,
                    found = other.type_str(),
                    "absence set is not a table, skipping"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AbsenceConfig::from_toml_str("").unwrap();
        assert_eq!(config.gating, GatingConfig::default());
        assert_eq!(config.gating.window_size, 30);
        assert_eq!(config.gating.min_e_hits, 3);
        assert_eq!(config.gating.min_tokens, 200);
        assert_eq!(config.gating.policy, AbsencePolicy::StrictZero);
        assert_eq!(config.gating.min_participation_msgs, 2);
        assert!(config.gating.per_speaker);
        assert!(config.absence_sets.is_empty());
        assert!(!config.reject_empty_sets);
    }

    #[test]
    fn test_full_config() {
        let config = AbsenceConfig::from_toml_str(
            r#"
[window]
messages = 6

[gating_conflict]
min_E_hits = 2
context_markers_by_tag = ["escalation"]

[escalation]
ids = ["ATO_DIRECT_ACCUSATION"]

[policy]
strict_zero = false
tolerant_max = 2
min_tokens = 40

[emit]
per_speaker = false

[absence_sets.threat]
ids = ["DIRECT_THREAT"]
tags = ["threat"]

[absence_sets.insult]
tags = ["insult"]
"#,
        )
        .unwrap();

        assert_eq!(config.gating.window_size, 6);
        assert_eq!(config.gating.min_e_hits, 2);
        assert_eq!(config.gating.min_tokens, 40);
        assert_eq!(config.gating.policy, AbsencePolicy::Tolerant { max: 2 });
        assert!(!config.gating.per_speaker);
        assert_eq!(config.escalation.ids, ["ATO_DIRECT_ACCUSATION"]);
        assert_eq!(config.escalation.tags, ["escalation"]);

        let names: Vec<_> = config.absence_sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["threat", "insult"]);
        assert_eq!(config.absence_sets[0].ids, ["DIRECT_THREAT"]);
        assert!(config.absence_sets[1].ids.is_empty());
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let config = AbsenceConfig::from_toml_str(
            r#"
window = "oops"

[gating_conflict]
min_E_hits = "4"

[policy]
min_tokens = [1, 2]
tolerant_max = -3
strict_zero = "maybe"
"#,
        )
        .unwrap();

        assert_eq!(config.gating.window_size, DEFAULT_WINDOW_MESSAGES);
        // numeric strings are coerced
        assert_eq!(config.gating.min_e_hits, 4);
        assert_eq!(config.gating.min_tokens, DEFAULT_MIN_TOKENS);
        assert_eq!(config.gating.policy, AbsencePolicy::StrictZero);
    }

    #[test]
    fn test_zero_window_uses_default() {
        let config = AbsenceConfig::from_toml_str("[window]\nmessages = 0\n").unwrap();
        assert_eq!(config.gating.window_size, DEFAULT_WINDOW_MESSAGES);
    }

    #[test]
    fn test_min_participation_precedence() {
        let both = AbsenceConfig::from_toml_str(
            "[meta]\nmin_participation_msgs = 4\n[policy]\nmin_participation_msgs = 3\n",
        )
        .unwrap();
        assert_eq!(both.gating.min_participation_msgs, 4);

        let policy_only =
            AbsenceConfig::from_toml_str("[policy]\nmin_participation_msgs = 3\n").unwrap();
        assert_eq!(policy_only.gating.min_participation_msgs, 3);

        let malformed_meta = AbsenceConfig::from_toml_str(
            "[meta]\nmin_participation_msgs = \"many\"\n[policy]\nmin_participation_msgs = 5\n",
        )
        .unwrap();
        assert_eq!(malformed_meta.gating.min_participation_msgs, 5);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = AbsenceConfig::from_toml_str("[window\nmessages = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[window]
messages = 10

[absence_sets.threat]
tags = ["threat"]
"#
        )
        .unwrap();

        let config = AbsenceConfig::load(file.path()).unwrap();
        assert_eq!(config.gating.window_size, 10);
        assert_eq!(config.absence_sets.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AbsenceConfig::load(Path::new("/nonexistent/absence.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_policy_passes() {
        assert!(AbsencePolicy::StrictZero.passes(0));
        assert!(!AbsencePolicy::StrictZero.passes(1));
        assert!(AbsencePolicy::Tolerant { max: 1 }.passes(1));
        assert!(!AbsencePolicy::Tolerant { max: 1 }.passes(2));
    }
}
