//! Manhattan distance heuristic.

use crate::board::grid::{Grid, Position, MAX_TILE, SIDE};

/// Goal cell of a non-blank tile: row ⌊(v−1)/4⌋, column (v−1) mod 4.
#[must_use]
pub fn goal_position(tile: u8) -> Option<Position> {
    if tile == 0 || tile > MAX_TILE {
        return None;
    }
    let side = u8::try_from(SIDE).ok()?;
    Position::new((tile - 1) / side, (tile - 1) % side)
}

/// Sum over all non-blank tiles of the row plus column distance to their goal cell.
#[must_use]
pub fn manhattan(grid: &Grid) -> u32 {
    grid.tiles()
        .iter()
        .enumerate()
        .filter_map(|(index, &tile)| {
            let here = Position::from_index(index)?;
            goal_position(tile).map(|goal| here.distance(goal))
        })
        .sum()
}
