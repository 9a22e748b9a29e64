//! Inversion-parity solvability check.
//!
//! This is a pre-search collaborator: the search engine never calls it and
//! must terminate on unsolvable input by exhausting its budget.

use crate::board::grid::{Grid, SIDE};

/// Number of pairs `(i, j)`, `i < j`, of non-blank tiles in row-major order
/// with `tile[i] > tile[j]`.
#[must_use]
pub fn inversions(grid: &Grid) -> u32 {
    let tiles: Vec<u8> = grid.tiles().iter().copied().filter(|&t| t != 0).collect();
    let mut count = 0;
    for (i, &a) in tiles.iter().enumerate() {
        count += tiles[i + 1..].iter().filter(|&&b| a > b).count();
    }
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Whether the goal is reachable from `grid`.
///
/// With the blank on row `r` counted from the bottom (1-based), the grid is
/// solvable iff `r` is even and the inversion count odd, or `r` is odd and
/// the inversion count even.
#[must_use]
pub fn is_solvable(grid: &Grid) -> bool {
    let Some(blank) = grid.find_blank() else {
        return false;
    };
    let row_from_bottom = SIDE - usize::from(blank.row);
    let odd_inversions = inversions(grid) % 2 == 1;
    if row_from_bottom % 2 == 0 {
        odd_inversions
    } else {
        !odd_inversions
    }
}
