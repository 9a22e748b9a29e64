//! `StateGraph`: append-only arena of every state a search created.
//!
//! States are stored in id order (`states[i].id == i + 1`), so any prefix of
//! the arena is exactly the graph as it was known when that many states
//! existed. Trace steps rely on this to reference a frozen graph snapshot by
//! length alone.

use fifteen_kernel::board::grid::{Grid, NeighborMove, Position};

use crate::node::{PuzzleState, StateId, StateMove, ROOT_STATE_ID};

/// Owning, growable state arena used during a search.
#[derive(Debug, Default)]
pub struct StateGraph {
    states: Vec<PuzzleState>,
}

impl StateGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the root state (id 1). Must be the first insertion.
    pub fn insert_root(&mut self, grid: Grid, blank_pos: Position, heuristic: u32) -> StateId {
        debug_assert!(self.states.is_empty(), "root inserted twice");
        self.states.push(PuzzleState {
            id: ROOT_STATE_ID,
            grid,
            blank_pos,
            cost: 0,
            heuristic,
            parent: None,
            producing_move: None,
        });
        ROOT_STATE_ID
    }

    /// Create a child of `parent` reached by `mv`, assigning the next id.
    pub fn insert_child(
        &mut self,
        parent: &PuzzleState,
        grid: Grid,
        mv: NeighborMove,
        moved_tile: u8,
        heuristic: u32,
    ) -> StateId {
        let id = self.next_id();
        self.states.push(PuzzleState {
            id,
            grid,
            blank_pos: mv.target,
            cost: parent.cost + 1,
            heuristic,
            parent: Some(parent.id),
            producing_move: Some(StateMove {
                direction: mv.direction,
                moved_tile,
            }),
        });
        id
    }

    /// The id the next inserted state will receive.
    #[must_use]
    pub fn next_id(&self) -> StateId {
        self.states.len() as StateId + 1
    }

    /// Borrow the arena as a read-only view.
    #[must_use]
    pub fn view(&self) -> GraphView<'_> {
        GraphView {
            states: &self.states,
        }
    }

    /// Look up a state that the caller knows exists.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never assigned by this graph. Ids only come from
    /// the graph itself, so a miss is an engine invariant violation.
    #[must_use]
    pub fn state(&self, id: StateId) -> &PuzzleState {
        &self.states[index_of(id)]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Freeze the arena for sharing with a finished trace.
    #[must_use]
    pub fn into_states(self) -> Vec<PuzzleState> {
        self.states
    }
}

/// Read-only view of a graph or of a prefix of one.
#[derive(Debug, Clone, Copy)]
pub struct GraphView<'a> {
    states: &'a [PuzzleState],
}

impl<'a> GraphView<'a> {
    /// View over states already known to be in id order.
    #[must_use]
    pub fn from_states(states: &'a [PuzzleState]) -> Self {
        Self { states }
    }

    /// The first `len` states (clamped to the view size).
    #[must_use]
    pub fn prefix(&self, len: usize) -> GraphView<'a> {
        GraphView {
            states: &self.states[..len.min(self.states.len())],
        }
    }

    #[must_use]
    pub fn get(&self, id: StateId) -> Option<&'a PuzzleState> {
        if id == 0 {
            return None;
        }
        self.states.get(index_of(id))
    }

    #[must_use]
    pub fn contains(&self, id: StateId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PuzzleState> {
        self.states.iter()
    }

    /// Reconstruct the path from the root to `id` by walking parent links.
    ///
    /// Returns ids root-first. An id outside the view yields an empty path.
    #[must_use]
    pub fn path_to(&self, id: StateId) -> Vec<StateId> {
        let mut path = Vec::new();
        let mut current = self.get(id);
        while let Some(state) = current {
            path.push(state.id);
            current = state.parent.and_then(|p| self.get(p));
        }
        path.reverse();
        path
    }
}

#[allow(clippy::cast_possible_truncation)]
fn index_of(id: StateId) -> usize {
    (id - 1) as usize
}
