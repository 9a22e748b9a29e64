//! Trace writer: builds immutable step snapshots during a search.
//!
//! The writer owns the cumulative explored/pruned/path lists. Every mutation
//! replaces the shared slice instead of editing it, so steps that were
//! already emitted keep their own version.

use std::sync::Arc;

use crate::contract::TraceObserver;
use crate::frontier::Frontier;
use crate::graph::StateGraph;
use crate::node::{PuzzleState, StateId};
use crate::policy::SearchPolicy;
use crate::trace::{Phase, Trace, TraceStep};

pub struct TraceWriter<'o> {
    steps: Vec<TraceStep>,
    explored: Arc<[StateId]>,
    pruned: Arc<[StateId]>,
    path: Arc<[StateId]>,
    best: Option<StateId>,
    observer: &'o mut dyn TraceObserver,
}

impl<'o> TraceWriter<'o> {
    #[must_use]
    pub fn new(observer: &'o mut dyn TraceObserver) -> Self {
        let empty: Arc<[StateId]> = Arc::from(Vec::new());
        Self {
            steps: Vec::new(),
            explored: empty.clone(),
            pruned: empty.clone(),
            path: empty,
            best: None,
            observer,
        }
    }

    /// Append a state to the explored list (takes effect from the next step).
    pub fn mark_explored(&mut self, id: StateId) {
        self.explored = appended(&self.explored, id);
    }

    /// Append a state to the pruned list (takes effect from the next step).
    pub fn mark_pruned(&mut self, id: StateId) {
        self.pruned = appended(&self.pruned, id);
    }

    /// Set the best-known goal and its root-first path.
    pub fn set_best(&mut self, id: StateId, path: Vec<StateId>) {
        self.best = Some(id);
        self.path = Arc::from(path);
    }

    #[must_use]
    pub fn best(&self) -> Option<StateId> {
        self.best
    }

    /// State the most recent step concerned (root before any step).
    #[must_use]
    pub fn last_current(&self) -> Option<StateId> {
        self.steps.last().map(|s| s.current_state_id)
    }

    /// Emit one snapshot and hand it to the observer.
    pub fn record(
        &mut self,
        phase: Phase,
        description: String,
        current: StateId,
        graph: &StateGraph,
        frontier: &Frontier,
    ) {
        let step = TraceStep {
            seq: self.steps.len() as u64,
            phase,
            description,
            current_state_id: current,
            best_state_id: self.best,
            known_states: graph.len(),
            active_states: frontier.ids(),
            explored_states: Arc::clone(&self.explored),
            pruned_states: Arc::clone(&self.pruned),
            path: Arc::clone(&self.path),
        };
        tracing::trace!(seq = step.seq, phase = phase.as_str(), current, "trace step");
        self.observer.on_step(&step, graph.view());
        self.steps.push(step);
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Seal the log together with the final graph.
    #[must_use]
    pub fn finish(self, graph: StateGraph, policy: SearchPolicy) -> Trace {
        let states: Arc<[PuzzleState]> = Arc::from(graph.into_states());
        Trace {
            states,
            steps: self.steps,
            policy,
        }
    }
}

fn appended(list: &Arc<[StateId]>, id: StateId) -> Arc<[StateId]> {
    let mut next = Vec::with_capacity(list.len() + 1);
    next.extend_from_slice(list);
    next.push(id);
    Arc::from(next)
}
