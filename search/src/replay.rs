//! `verify_trace()`: re-derive a trace's invariants from its own contents.
//!
//! Nothing here trusts the engine. The state arena is re-checked against the
//! puzzle rules (every child is one legal blank move from its parent, costs
//! and heuristics recompute), and the step log is walked in order checking
//! that each snapshot follows from the one before it.

use std::collections::BTreeMap;

use fifteen_kernel::board::grid::GridKey;
use fifteen_kernel::board::heuristic::manhattan;

use crate::graph::GraphView;
use crate::node::{FrontierKey, PuzzleState, StateId, ROOT_STATE_ID};
use crate::trace::{Phase, Trace, TraceStep};

/// A trace that does not hold together.
///
/// `step` fields are 0-based step indices; `id` fields are state ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The trace has no steps or no states.
    Empty,
    /// `states[index].id` is not `index + 1`.
    NonDenseIds { index: usize, id: StateId },
    /// A state disagrees with the puzzle rules.
    BadState { id: StateId, detail: String },
    /// Two states share a configuration.
    DuplicateConfiguration { id: StateId, first: StateId },
    /// A step's `seq` does not match its position.
    SeqMismatch { step: usize, seq: u64 },
    /// The first step is not `init` or the last is not `complete`, or a
    /// `complete` step appears before the end.
    BadPhaseOrder { step: usize, phase: Phase },
    /// `known_states` shrank or exceeds the arena.
    KnownStates { step: usize, known: usize },
    /// A step references a state outside its own graph snapshot.
    UnknownState { step: usize, id: StateId },
    /// The explored list changed other than by appending the current state
    /// on a `branch` step.
    Explored { step: usize },
    /// The pruned list changed other than by appending the current state on
    /// a `prune` step.
    Pruned { step: usize },
    /// The frontier is out of rank order or overlaps explored/pruned states.
    Frontier { step: usize, detail: String },
    /// The best path is malformed.
    Path { step: usize, detail: String },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "trace is empty"),
            Self::NonDenseIds { index, id } => {
                write!(f, "state at index {index} has id {id}")
            }
            Self::BadState { id, detail } => write!(f, "state {id}: {detail}"),
            Self::DuplicateConfiguration { id, first } => {
                write!(f, "state {id} repeats the configuration of state {first}")
            }
            Self::SeqMismatch { step, seq } => write!(f, "step {step} has seq {seq}"),
            Self::BadPhaseOrder { step, phase } => {
                write!(f, "step {step}: phase {phase} out of order")
            }
            Self::KnownStates { step, known } => {
                write!(f, "step {step}: known_states {known} is inconsistent")
            }
            Self::UnknownState { step, id } => {
                write!(f, "step {step} references unknown state {id}")
            }
            Self::Explored { step } => write!(f, "step {step}: explored list diverges"),
            Self::Pruned { step } => write!(f, "step {step}: pruned list diverges"),
            Self::Frontier { step, detail } => write!(f, "step {step}: frontier {detail}"),
            Self::Path { step, detail } => write!(f, "step {step}: path {detail}"),
        }
    }
}

impl std::error::Error for ReplayError {}

/// Verify a complete trace.
///
/// # Errors
///
/// Returns the first [`ReplayError`] found.
pub fn verify_trace(trace: &Trace) -> Result<(), ReplayError> {
    if trace.steps.is_empty() || trace.states.is_empty() {
        return Err(ReplayError::Empty);
    }
    verify_states(&trace.states)?;

    let graph = trace.graph();
    let last = trace.steps.len() - 1;
    let mut prev: Option<&TraceStep> = None;
    for (index, step) in trace.steps.iter().enumerate() {
        verify_step(index, last, step, prev, graph)?;
        prev = Some(step);
    }
    if trace.steps[last].known_states != graph.len() {
        return Err(ReplayError::KnownStates {
            step: last,
            known: trace.steps[last].known_states,
        });
    }
    Ok(())
}

fn verify_states(states: &[PuzzleState]) -> Result<(), ReplayError> {
    let mut seen: BTreeMap<GridKey, StateId> = BTreeMap::new();
    for (index, state) in states.iter().enumerate() {
        if state.id != index as StateId + 1 {
            return Err(ReplayError::NonDenseIds {
                index,
                id: state.id,
            });
        }
        let bad = |detail: &str| ReplayError::BadState {
            id: state.id,
            detail: detail.to_string(),
        };

        if state.grid.find_blank() != Some(state.blank_pos) {
            return Err(bad("blank position does not match grid"));
        }
        if state.heuristic != manhattan(&state.grid) {
            return Err(bad("heuristic does not match grid"));
        }

        match (state.parent, state.producing_move) {
            (None, None) => {
                if state.id != ROOT_STATE_ID || state.cost != 0 {
                    return Err(bad("only the root may lack a parent"));
                }
            }
            (Some(parent_id), Some(mv)) => {
                if parent_id == 0 || parent_id >= state.id {
                    return Err(bad("parent must be an older state"));
                }
                let parent = &states[index_of(parent_id)];
                if state.cost != parent.cost + 1 {
                    return Err(bad("cost is not parent cost + 1"));
                }
                if parent.blank_pos.step(mv.direction) != Some(state.blank_pos) {
                    return Err(bad("move direction does not match blank positions"));
                }
                let (expected, moved) = parent.grid.apply_move(parent.blank_pos, state.blank_pos);
                if expected != state.grid || moved != mv.moved_tile {
                    return Err(bad("grid is not one move from parent"));
                }
            }
            _ => return Err(bad("parent and move must be both present or both absent")),
        }

        if let Some(&first) = seen.get(&state.grid.canonical_key()) {
            return Err(ReplayError::DuplicateConfiguration {
                id: state.id,
                first,
            });
        }
        seen.insert(state.grid.canonical_key(), state.id);
    }
    Ok(())
}

fn verify_step(
    index: usize,
    last: usize,
    step: &TraceStep,
    prev: Option<&TraceStep>,
    full: GraphView<'_>,
) -> Result<(), ReplayError> {
    if step.seq != index as u64 {
        return Err(ReplayError::SeqMismatch {
            step: index,
            seq: step.seq,
        });
    }
    let phase_ok = match step.phase {
        Phase::Init => index == 0,
        Phase::Complete => index == last,
        _ => index != 0,
    };
    if !phase_ok || (index == last && step.phase != Phase::Complete) {
        return Err(ReplayError::BadPhaseOrder {
            step: index,
            phase: step.phase,
        });
    }

    let prev_known = prev.map_or(1, |p| p.known_states);
    if step.known_states < prev_known || step.known_states > full.len() {
        return Err(ReplayError::KnownStates {
            step: index,
            known: step.known_states,
        });
    }
    let graph = full.prefix(step.known_states);

    let referenced = std::iter::once(step.current_state_id)
        .chain(step.best_state_id)
        .chain(step.active_states.iter().copied())
        .chain(step.explored_states.iter().copied())
        .chain(step.pruned_states.iter().copied())
        .chain(step.path.iter().copied());
    for id in referenced {
        if !graph.contains(id) {
            return Err(ReplayError::UnknownState { step: index, id });
        }
    }

    let (prev_explored, prev_pruned): (&[StateId], &[StateId]) = match prev {
        Some(p) => (p.explored_states.as_ref(), p.pruned_states.as_ref()),
        None => (&[], &[]),
    };
    if !grew_by(prev_explored, &step.explored_states, step, Phase::Branch) {
        return Err(ReplayError::Explored { step: index });
    }
    if !grew_by(prev_pruned, &step.pruned_states, step, Phase::Prune) {
        return Err(ReplayError::Pruned { step: index });
    }

    verify_frontier(index, step, graph)?;
    verify_path(index, step, graph)
}

/// `next` equals `prev`, or is `prev` plus the step's current state when the
/// step has the given phase.
fn grew_by(prev: &[StateId], next: &[StateId], step: &TraceStep, phase: Phase) -> bool {
    if next == prev {
        return true;
    }
    step.phase == phase
        && next.len() == prev.len() + 1
        && next.starts_with(prev)
        && next.last() == Some(&step.current_state_id)
}

fn verify_frontier(index: usize, step: &TraceStep, graph: GraphView<'_>) -> Result<(), ReplayError> {
    let keys: Vec<FrontierKey> = step
        .active_states
        .iter()
        .filter_map(|&id| graph.get(id))
        .map(FrontierKey::from)
        .collect();
    if keys.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ReplayError::Frontier {
            step: index,
            detail: "is not in (total_cost, id) order".to_string(),
        });
    }
    let closed = |id: &StateId| step.explored_states.contains(id) || step.pruned_states.contains(id);
    if let Some(id) = step.active_states.iter().copied().find(closed) {
        return Err(ReplayError::Frontier {
            step: index,
            detail: format!("still holds closed state {id}"),
        });
    }
    Ok(())
}

fn verify_path(index: usize, step: &TraceStep, graph: GraphView<'_>) -> Result<(), ReplayError> {
    let err = |detail: String| ReplayError::Path {
        step: index,
        detail,
    };
    let Some(best) = step.best_state_id else {
        return if step.path.is_empty() {
            Ok(())
        } else {
            Err(err("is set without a best state".to_string()))
        };
    };
    if step.path.last() != Some(&best) {
        return Err(err(format!("does not end at best state {best}")));
    }
    if step.path.first() != Some(&ROOT_STATE_ID) {
        return Err(err("does not start at the root".to_string()));
    }

    let states: Vec<&PuzzleState> = step.path.iter().filter_map(|&id| graph.get(id)).collect();
    for pair in states.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if to.parent != Some(from.id) {
            return Err(err(format!("{} is not a child of {}", to.id, from.id)));
        }
        if from.blank_pos.distance(to.blank_pos) != 1
            || from.grid.apply_move(from.blank_pos, to.blank_pos).0 != to.grid
        {
            return Err(err(format!("{} -> {} is not a legal move", from.id, to.id)));
        }
    }
    if states.last().is_some_and(|s| !s.grid.is_goal()) {
        return Err(err(format!("best state {best} is not the goal")));
    }
    Ok(())
}

fn index_of(id: StateId) -> usize {
    usize::try_from(id - 1).unwrap_or(usize::MAX)
}
