//! Acceptance scenarios A–D.

use fifteen_kernel::board::grid::Direction;
use fifteen_kernel::board::heuristic::manhattan;
use fifteen_search::node::ROOT_STATE_ID;
use fifteen_search::policy::SearchPolicy;
use fifteen_search::replay::verify_trace;
use fifteen_search::search::{solve, SolveOutcome, TerminationReason};
use fifteen_search::trace::Phase;
use lock_tests::scenarios;

/// ACCEPTANCE: SCN-A-GOAL
#[test]
fn scenario_a_goal_input() {
    let result = solve(&scenarios::goal(), &SearchPolicy::default()).unwrap();
    assert_eq!(
        result.outcome,
        SolveOutcome::Solved {
            goal: ROOT_STATE_ID,
            path: vec![ROOT_STATE_ID],
            cost: 0
        }
    );
    assert_eq!(result.stats.states_created, 1);
    let last = result.trace.last_step().unwrap();
    assert_eq!(last.phase, Phase::Complete);
    assert_eq!(&*last.path, &[ROOT_STATE_ID]);
    verify_trace(&result.trace).unwrap();
}

/// ACCEPTANCE: SCN-B-ONE-MOVE
#[test]
fn scenario_b_one_move() {
    let result = solve(&scenarios::one_move(), &SearchPolicy::default()).unwrap();
    let SolveOutcome::Solved { goal, path, cost } = &result.outcome else {
        panic!("expected a solution, got {:?}", result.outcome);
    };
    assert_eq!(*cost, 1);
    assert_eq!(path.len(), 2);
    assert_eq!(path.last(), Some(goal));
    assert_eq!(result.moves(), vec![Direction::Right]);

    let graph = result.trace.graph();
    let goal_state = graph.get(*goal).unwrap();
    assert_eq!(goal_state.producing_move.unwrap().moved_tile, 15);
    assert!(goal_state.grid.is_goal());
    verify_trace(&result.trace).unwrap();
}

/// ACCEPTANCE: SCN-C-UNSOLVABLE
#[test]
fn scenario_c_unsolvable_exhausts_budget() {
    let budget = 2000;
    let result = solve(&scenarios::swapped_pair(), &SearchPolicy::with_budget(budget)).unwrap();
    assert_eq!(
        result.outcome,
        SolveOutcome::NotFound {
            reason: TerminationReason::StateBudgetExhausted
        }
    );
    assert!(result.trace.states.len() as u64 <= budget + 1);
    assert_eq!(result.stats.states_created, budget + 1);

    let last = result.trace.last_step().unwrap();
    assert_eq!(last.phase, Phase::Complete);
    assert!(last.path.is_empty());
    assert_eq!(
        last.description,
        "No solution found within the search limit."
    );
    verify_trace(&result.trace).unwrap();
}

/// ACCEPTANCE: SCN-D-SIX-MOVES
#[test]
fn scenario_d_six_move_scramble() {
    let grid = scenarios::six_moves();
    assert_eq!(manhattan(&grid), 6);

    let result = solve(&grid, &SearchPolicy::default()).unwrap();
    let cost = result.cost().expect("six-move scramble is solved");
    assert!(cost <= 6, "solution longer than the scramble: {cost}");
    assert!(cost >= manhattan(&grid), "solution shorter than the heuristic");
    assert_eq!(result.moves().len(), cost as usize);

    // Replaying the moves from the start must reach the goal.
    let mut current = grid;
    for direction in result.moves() {
        let blank = current.find_blank().unwrap();
        let target = blank.step(direction).expect("move stays on the board");
        current = current.apply_move(blank, target).0;
    }
    assert!(current.is_goal());
    verify_trace(&result.trace).unwrap();
}

/// ACCEPTANCE: SCN-D-SIX-MOVES
#[test]
fn scenario_d_reverses_the_scramble() {
    let result = solve(&scenarios::six_moves(), &SearchPolicy::default()).unwrap();
    let undo: Vec<Direction> = scenarios::SIX_MOVE_SCRAMBLE
        .iter()
        .rev()
        .map(|d| d.opposite())
        .collect();
    assert_eq!(result.moves(), undo);
}
