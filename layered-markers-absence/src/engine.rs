//! Aggregation driver: segment, gate, resolve, emit, merge.

use serde::Serialize;

use layered_markers::{Hit, MarkerRecord, Message};

use crate::absence_set::{ResolutionWarning, ResolvedAbsenceSets};
use crate::config::{AbsenceConfig, GatingConfig};
use crate::emitter::emit_for_window;
use crate::errors::ConfigResult;
use crate::gate::{evaluate_gate, EscalationSet, GateDecision};
use crate::window::{segment, Window};
use crate::TagIndex;

/// Outcome for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub window: Window,
    pub gate: GateDecision,
    /// Empty unless the gate opened
    pub synthetic: Vec<Hit>,
}

/// Absence inference over a whole transcript.
///
/// Holds the escalation set and the resolved absence categories, both built
/// once at construction and never changed afterwards. Every method is a pure
/// function of its inputs and this state.
#[derive(Debug, Clone)]
pub struct AbsenceEngine {
    gating: GatingConfig,
    escalation: EscalationSet,
    sets: ResolvedAbsenceSets,
}

impl AbsenceEngine {
    /// Resolve escalation ids and absence categories against `index`.
    pub fn new(config: &AbsenceConfig, index: &TagIndex) -> ConfigResult<Self> {
        let escalation = EscalationSet::resolve(&config.escalation, index);
        let sets =
            ResolvedAbsenceSets::resolve(&config.absence_sets, index, config.reject_empty_sets)?;
        if escalation.is_empty() {
            tracing::warn!("escalation set is empty, no window can open its gate");
        }
        Ok(Self::from_parts(config.gating.clone(), escalation, sets))
    }

    pub fn from_parts(
        gating: GatingConfig,
        escalation: EscalationSet,
        sets: ResolvedAbsenceSets,
    ) -> Self {
        Self {
            gating,
            escalation,
            sets,
        }
    }

    /// Replace the escalation set with an explicit one.
    pub fn with_escalation(mut self, escalation: EscalationSet) -> Self {
        self.escalation = escalation;
        self
    }

    pub fn gating(&self) -> &GatingConfig {
        &self.gating
    }

    pub fn escalation(&self) -> &EscalationSet {
        &self.escalation
    }

    pub fn absence_sets(&self) -> &ResolvedAbsenceSets {
        &self.sets
    }

    pub fn resolution_warnings(&self) -> &[ResolutionWarning] {
        self.sets.warnings()
    }

    /// Gate every window and emit synthetic hits for the open ones.
    pub fn evaluate(&self, messages: &[Message], hits: &[Hit]) -> Vec<WindowReport> {
        segment(messages, hits, self.gating.window_size)
            .into_iter()
            .map(|slice| {
                let gate = evaluate_gate(
                    slice.messages,
                    &slice.hits,
                    &self.escalation,
                    self.gating.min_e_hits,
                    self.gating.min_tokens,
                );
                tracing::debug!(
                    window = slice.window.index,
                    start = slice.window.start,
                    end = slice.window.end,
                    e_count = gate.e_count,
                    token_count = gate.token_count,
                    open = gate.open,
                    "window gate"
                );

                let synthetic = if gate.open {
                    emit_for_window(&slice, &self.sets, &self.gating)
                } else {
                    Vec::new()
                };
                WindowReport {
                    window: slice.window,
                    gate,
                    synthetic,
                }
            })
            .collect()
    }

    /// Synthetic hits only, by ascending window.
    pub fn synthesize(&self, messages: &[Message], hits: &[Hit]) -> Vec<Hit> {
        self.evaluate(messages, hits)
            .into_iter()
            .flat_map(|report| report.synthetic)
            .collect()
    }

    /// `hits` unchanged, followed by the synthetic hits.
    pub fn aggregate(&self, messages: &[Message], hits: &[Hit]) -> Vec<Hit> {
        let synthetic = self.synthesize(messages, hits);
        let mut merged = Vec::with_capacity(hits.len() + synthetic.len());
        merged.extend_from_slice(hits);
        merged.extend(synthetic);
        merged
    }
}

/// Build the tag index from `records`, resolve `config` and aggregate.
pub fn integrate_absence_detection(
    messages: &[Message],
    hits: &[Hit],
    config: &AbsenceConfig,
    records: &[MarkerRecord],
) -> ConfigResult<Vec<Hit>> {
    let index = TagIndex::build(records);
    let engine = AbsenceEngine::new(config, &index)?;
    Ok(engine.aggregate(messages, hits))
}
