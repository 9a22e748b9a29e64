//! Single source of truth for the acceptance scenarios.
//!
//! Used by both the `trace_fixture` binary and the integration tests, so the
//! cross-process harness and the in-process assertions can never drift apart.

use fifteen_kernel::board::grid::{Direction, Grid};

/// Scenario A: the solved configuration.
#[must_use]
pub fn goal() -> Grid {
    Grid::goal()
}

/// Scenario B: one blank move (right) from the goal.
///
/// # Panics
///
/// Never: the rows are a fixed permutation.
#[must_use]
pub fn one_move() -> Grid {
    Grid::from_rows([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 0, 15]])
        .expect("fixed permutation")
}

/// Scenario C: tiles 1 and 2 swapped. Wrong parity, so never solvable.
///
/// # Panics
///
/// Never: the rows are a fixed permutation.
#[must_use]
pub fn swapped_pair() -> Grid {
    Grid::from_rows([[2, 1, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 0]])
        .expect("fixed permutation")
}

/// Blank moves that scramble the goal into scenario D.
pub const SIX_MOVE_SCRAMBLE: [Direction; 6] = [
    Direction::Up,
    Direction::Up,
    Direction::Up,
    Direction::Left,
    Direction::Left,
    Direction::Left,
];

/// Scenario D: six blank moves from the goal, Manhattan distance six.
#[must_use]
pub fn six_moves() -> Grid {
    scramble(&SIX_MOVE_SCRAMBLE)
}

/// Apply blank moves to the goal, skipping any that would leave the board.
///
/// # Panics
///
/// Panics if the grid loses its blank (a kernel bug).
#[must_use]
pub fn scramble(moves: &[Direction]) -> Grid {
    let mut grid = Grid::goal();
    for &direction in moves {
        let blank = grid.find_blank().expect("grid has a blank");
        if let Some(target) = blank.step(direction) {
            grid = grid.apply_move(blank, target).0;
        }
    }
    grid
}

/// A deterministic mix of grids for property-style checks.
#[must_use]
pub fn corpus() -> Vec<Grid> {
    let walks: [&[Direction]; 4] = [
        &[Direction::Left, Direction::Up, Direction::Left, Direction::Up],
        &[
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Right,
        ],
        &[
            Direction::Left,
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Left,
        ],
        &SIX_MOVE_SCRAMBLE,
    ];
    let mut grids = vec![goal(), one_move(), swapped_pair()];
    grids.extend(walks.iter().map(|w| scramble(w)));
    grids
}
