//! Core search state and frontier ordering types.

use fifteen_kernel::board::grid::{Direction, Grid, Position};

/// Integer handle of a state in the [`crate::graph::StateGraph`] arena.
///
/// Assigned from a per-search monotonic counter, never reused.
pub type StateId = u64;

/// Id of the root state in every search.
pub const ROOT_STATE_ID: StateId = 1;

/// The move that produced a state from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMove {
    /// Direction the blank travelled.
    pub direction: Direction,
    /// Value of the tile that swapped places with the blank.
    pub moved_tile: u8,
}

/// An immutable node in the explored search tree.
///
/// Ordering for frontier extraction uses `(total_cost, id)`: lower total
/// cost first, ties broken by older generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleState {
    /// Monotonic identifier (root = 1).
    pub id: StateId,
    /// Tile arrangement at this node.
    pub grid: Grid,
    /// Cached blank location.
    pub blank_pos: Position,
    /// Moves from the root (g).
    pub cost: u32,
    /// Manhattan distance to the goal (h).
    pub heuristic: u32,
    /// Predecessor id (`None` for the root).
    pub parent: Option<StateId>,
    /// Move from the parent (`None` for the root).
    pub producing_move: Option<StateMove>,
}

impl PuzzleState {
    /// `total_cost = cost + heuristic` (the frontier ranking key).
    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.cost.saturating_add(self.heuristic)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// JSON form used in serialized traces.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "blank_pos": [self.blank_pos.row, self.blank_pos.col],
            "cost": self.cost,
            "grid": self.grid.to_json(),
            "heuristic": self.heuristic,
            "id": self.id,
            "move": self.producing_move.map(|m| m.direction.as_str()),
            "moved_tile": self.producing_move.map(|m| m.moved_tile),
            "parent": self.parent,
            "total_cost": self.total_cost(),
        })
    }
}

/// The frontier ordering key: `(total_cost, id)`.
///
/// Ids grow with generation order, so breaking ties by id is the same as a
/// stable sort over insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierKey {
    pub total_cost: u32,
    pub id: StateId,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.total_cost
            .cmp(&other.total_cost)
            .then(self.id.cmp(&other.id))
    }
}

impl From<&PuzzleState> for FrontierKey {
    fn from(state: &PuzzleState) -> Self {
        Self {
            total_cost: state.total_cost(),
            id: state.id,
        }
    }
}
