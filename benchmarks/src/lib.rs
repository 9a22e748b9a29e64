//! Shared helpers for fifteen benchmark suites.

use fifteen_harness::config::RunConfig;
use fifteen_kernel::board::grid::{neighbor_moves, Direction, Grid};
use fifteen_search::policy::{GoalPolicy, SearchPolicy};

/// A named benchmark workload.
pub struct Regime {
    pub name: &'static str,
    pub grid: Grid,
    pub policy: SearchPolicy,
}

impl Regime {
    /// The harness configuration that reproduces this regime.
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(self.grid);
        config.state_budget = self.policy.state_budget;
        config.goal_policy = self.policy.goal_policy;
        config.require_solvable = false;
        config
    }
}

/// Apply blank moves to the goal, skipping moves that would leave the board.
///
/// # Panics
///
/// Panics if the grid loses its blank (a kernel bug).
#[must_use]
pub fn scramble(moves: &[Direction]) -> Grid {
    let mut grid = Grid::goal();
    for &direction in moves {
        let blank = grid.find_blank().expect("grid has a blank");
        if let Some(step) = neighbor_moves(blank).find(|m| m.direction == direction) {
            grid = grid.apply_move(blank, step.target).0;
        }
    }
    grid
}

/// Six blank moves from the goal: solved on the first goal selection.
#[must_use]
pub fn regime_six_moves() -> Regime {
    use Direction::{Left, Up};
    Regime {
        name: "six_moves",
        grid: scramble(&[Up, Up, Up, Left, Left, Left]),
        policy: SearchPolicy::with_budget(1000),
    }
}

/// A deeper scramble searched to exhaustion for the optimal cost.
#[must_use]
pub fn regime_exhaustive() -> Regime {
    use Direction::{Down, Left, Right, Up};
    Regime {
        name: "exhaustive",
        grid: scramble(&[Up, Left, Up, Left, Down, Right, Up, Up, Left, Down]),
        policy: SearchPolicy {
            state_budget: 2000,
            goal_policy: GoalPolicy::ExhaustFrontier,
        },
    }
}

/// Wrong parity: the search always runs the budget dry.
///
/// # Panics
///
/// Never: the rows are a fixed permutation.
#[must_use]
pub fn regime_budget_limited() -> Regime {
    Regime {
        name: "budget_limited",
        grid: Grid::from_rows([[2, 1, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 0]])
            .expect("fixed permutation"),
        policy: SearchPolicy::with_budget(1000),
    }
}

/// Every regime, in report order.
#[must_use]
pub fn all_regimes() -> Vec<Regime> {
    vec![
        regime_six_moves(),
        regime_exhaustive(),
        regime_budget_limited(),
    ]
}
