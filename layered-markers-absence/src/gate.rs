//! Escalation gate: is a window an active conflict?

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use layered_markers::{Hit, Message};

use crate::config::EscalationSpec;
use crate::TagIndex;

/// Resolved escalation marker ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscalationSet {
    ids: BTreeSet<String>,
}

impl EscalationSet {
    pub fn new<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Explicit ids plus every id carrying one of the configured tags.
    pub fn resolve(spec: &EscalationSpec, index: &TagIndex) -> Self {
        let mut ids: BTreeSet<String> = spec.ids.iter().cloned().collect();
        for tag in &spec.tags {
            match index.ids_for_tag(tag) {
                Some(tagged) => ids.extend(tagged.iter().cloned()),
                None => tracing::warn!(tag = %tag, "escalation tag matches no markers"),
            }
        }
        Self { ids }
    }

    pub fn contains(&self, marker_id: &str) -> bool {
        self.ids.contains(marker_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Measurements behind a gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Window hits whose marker is an escalation marker
    pub e_count: usize,
    /// Whitespace-delimited words across the window's messages
    pub token_count: usize,
    pub open: bool,
}

/// Decide whether a window is an active conflict.
///
/// Opens iff `e_count >= min_e_hits` and `token_count >= min_tokens`.
pub fn evaluate_gate(
    messages: &[Message],
    hits: &[&Hit],
    escalation: &EscalationSet,
    min_e_hits: usize,
    min_tokens: usize,
) -> GateDecision {
    let e_count = hits
        .iter()
        .filter(|hit| escalation.contains(&hit.marker_id))
        .count();
    let token_count = messages.iter().map(Message::token_count).sum();

    GateDecision {
        e_count,
        token_count,
        open: e_count >= min_e_hits && token_count >= min_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_markers::MarkerRecord;

    fn window() -> (Vec<Message>, Vec<Hit>) {
        let messages = vec![
            Message::new(0, "A", "du lügst doch immer"),
            Message::new(1, "B", "das stimmt so nicht"),
        ];
        let hits = vec![
            Hit::new(0, "A", "ATO_DIRECT_ACCUSATION"),
            Hit::new(0, "A", "ATO_EMO_HIGH_VALENCE_MARKER"),
            Hit::new(1, "B", "ATO_SLANG_TOKEN"),
        ];
        (messages, hits)
    }

    #[test]
    fn test_gate_needs_both_thresholds() {
        let (messages, hits) = window();
        let hits: Vec<&Hit> = hits.iter().collect();
        let escalation = EscalationSet::new(["ATO_DIRECT_ACCUSATION", "ATO_EMO_HIGH_VALENCE_MARKER"]);

        let open = evaluate_gate(&messages, &hits, &escalation, 2, 8);
        assert_eq!(
            open,
            GateDecision {
                e_count: 2,
                token_count: 8,
                open: true
            }
        );
        assert!(!evaluate_gate(&messages, &hits, &escalation, 3, 8).open);
        assert!(!evaluate_gate(&messages, &hits, &escalation, 2, 9).open);
    }

    #[test]
    fn test_resolve_by_tag() {
        let records = vec![
            MarkerRecord::new("ATO_DIRECT_ACCUSATION", ["escalation"]),
            MarkerRecord::new("ATO_EMO_HIGH_VALENCE_MARKER", ["escalation", "emotion"]),
            MarkerRecord::new("ATO_SLANG_TOKEN", ["register"]),
        ];
        let index = TagIndex::build(&records);
        let spec = EscalationSpec {
            ids: vec!["SEM_BLAME_SHIFT".into()],
            tags: vec!["escalation".into(), "unknown".into()],
        };

        let set = EscalationSet::resolve(&spec, &index);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            ["ATO_DIRECT_ACCUSATION", "ATO_EMO_HIGH_VALENCE_MARKER", "SEM_BLAME_SHIFT"]
        );
    }
}
