//! Search trace: the ordered log of step snapshots.
//!
//! The normative decision surface is the ordered list of [`TraceStep`]s.
//! Each step is a complete snapshot (frontier, explored set, pruned set,
//! best path, graph size) so any prefix can be replayed without the steps
//! before it. The graph itself is shared: a step's snapshot is the first
//! `known_states` entries of [`Trace::states`].

use std::sync::Arc;

use fifteen_kernel::proof::canon::{canonical_json_bytes, CanonError};
use fifteen_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::graph::GraphView;
use crate::node::{PuzzleState, StateId};
use crate::policy::SearchPolicy;

/// Schema tag written into serialized traces.
pub const TRACE_SCHEMA: &str = "fifteen.search_trace.v1";

/// Kind of algorithmic event a step records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root created and scheduled.
    Init,
    /// A state was selected from the frontier, or a new state was created.
    Branch,
    /// A new state passed the bound test and was enqueued.
    Bound,
    /// A new state failed the bound test and was discarded.
    Prune,
    /// A cheaper goal replaced the incumbent (exhaustive goal policy only).
    Update,
    /// The search ended, with or without a solution.
    Complete,
}

impl Phase {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Branch => "branch",
            Self::Bound => "bound",
            Self::Prune => "prune",
            Self::Update => "update",
            Self::Complete => "complete",
        }
    }

    /// Parse a name produced by [`Phase::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::Init,
            Self::Branch,
            Self::Bound,
            Self::Prune,
            Self::Update,
            Self::Complete,
        ]
        .into_iter()
        .find(|p| p.as_str() == name)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable snapshot of the search.
///
/// The id lists are shared slices: consecutive steps that did not change a
/// list point at the same allocation, but no step ever observes a later
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    /// Position in the trace (0-based).
    pub seq: u64,
    pub phase: Phase,
    /// Human-readable rationale. Not load-bearing.
    pub description: String,
    /// The state this step concerns.
    pub current_state_id: StateId,
    /// Best goal known at this point.
    pub best_state_id: Option<StateId>,
    /// Number of states in the graph at this point (ids `1..=known_states`).
    pub known_states: usize,
    /// Frontier contents in rank order.
    pub active_states: Vec<StateId>,
    /// States popped for expansion so far, in selection order.
    pub explored_states: Arc<[StateId]>,
    /// States discarded by the bound test so far, in discard order.
    pub pruned_states: Arc<[StateId]>,
    /// Root-to-best path, empty until a goal is known.
    pub path: Arc<[StateId]>,
}

impl TraceStep {
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "active_states": self.active_states,
            "best_state_id": self.best_state_id,
            "current_state_id": self.current_state_id,
            "description": self.description,
            "explored_states": &*self.explored_states,
            "known_states": self.known_states,
            "path": &*self.path,
            "phase": self.phase.as_str(),
            "pruned_states": &*self.pruned_states,
            "seq": self.seq,
        })
    }
}

/// The complete, ordered audit trail of one search.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Every state created, in id order.
    pub states: Arc<[PuzzleState]>,
    /// Ordered step log.
    pub steps: Vec<TraceStep>,
    /// Policy the search ran under.
    pub policy: SearchPolicy,
}

/// A step paired with the graph as it stood at that step.
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a> {
    pub step: &'a TraceStep,
    graph: GraphView<'a>,
}

impl<'a> StepView<'a> {
    /// The frozen graph snapshot for this step.
    #[must_use]
    pub fn graph(&self) -> GraphView<'a> {
        self.graph
    }

    /// States on the best path, resolved against this step's snapshot.
    #[must_use]
    pub fn path_states(&self) -> Vec<&'a PuzzleState> {
        self.step
            .path
            .iter()
            .filter_map(|&id| self.graph.get(id))
            .collect()
    }
}

impl Trace {
    /// The full graph as known at the end of the search.
    #[must_use]
    pub fn graph(&self) -> GraphView<'_> {
        GraphView::from_states(&self.states)
    }

    /// The `index`-th step with its graph snapshot.
    #[must_use]
    pub fn view(&self, index: usize) -> Option<StepView<'_>> {
        let step = self.steps.get(index)?;
        Some(StepView {
            step,
            graph: self.graph().prefix(step.known_states),
        })
    }

    /// All steps with their snapshots, in order.
    pub fn views(&self) -> impl Iterator<Item = StepView<'_>> {
        (0..self.steps.len()).filter_map(|i| self.view(i))
    }

    /// The terminal step.
    #[must_use]
    pub fn last_step(&self) -> Option<&TraceStep> {
        self.steps.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps with the given phase.
    #[must_use]
    pub fn count_phase(&self, phase: Phase) -> usize {
        self.steps.iter().filter(|s| s.phase == phase).count()
    }

    /// Convert to a `serde_json::Value` for canonical serialization.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "policy": self.policy.to_json(),
            "schema": TRACE_SCHEMA,
            "states": self.states.iter().map(PuzzleState::to_json).collect::<Vec<_>>(),
            "steps": self.steps.iter().map(TraceStep::to_json).collect::<Vec<_>>(),
        })
    }

    /// Serialize the trace to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content hash of the canonical bytes under [`HashDomain::SearchTrace`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::SearchTrace, &bytes))
    }
}
