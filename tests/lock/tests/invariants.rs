//! Trace and graph invariants checked over a fixed corpus of grids.

use std::collections::BTreeSet;

use fifteen_kernel::board::heuristic::manhattan;
use fifteen_search::contract::TraceObserver;
use fifteen_search::graph::GraphView;
use fifteen_search::policy::{GoalPolicy, SearchPolicy};
use fifteen_search::replay::verify_trace;
use fifteen_search::search::{solve, solve_with_observer, SolveResult};
use fifteen_search::trace::{Phase, TraceStep};
use lock_tests::scenarios;

const BUDGETS: [u64; 3] = [1, 37, 600];

fn all_results() -> Vec<SolveResult> {
    let mut results = Vec::new();
    for grid in scenarios::corpus() {
        for state_budget in BUDGETS {
            for goal_policy in [GoalPolicy::FirstGoal, GoalPolicy::ExhaustFrontier] {
                let policy = SearchPolicy {
                    state_budget,
                    goal_policy,
                };
                results.push(solve(&grid, &policy).unwrap());
            }
        }
    }
    results
}

/// ACCEPTANCE: INV-VISITED-UNIQUE
#[test]
fn no_two_states_share_a_configuration() {
    for result in all_results() {
        let mut keys = BTreeSet::new();
        for state in result.trace.states.iter() {
            assert!(
                keys.insert(state.grid.canonical_key()),
                "state {} repeats a configuration",
                state.id
            );
        }
    }
}

/// ACCEPTANCE: INV-HEURISTIC
#[test]
fn every_state_carries_its_manhattan_distance() {
    for result in all_results() {
        for state in result.trace.states.iter() {
            assert_eq!(state.heuristic, manhattan(&state.grid));
            assert_eq!(state.total_cost(), state.cost + state.heuristic);
        }
    }
}

/// ACCEPTANCE: INV-BUDGET
#[test]
fn graph_never_exceeds_budget_plus_root() {
    for result in all_results() {
        let budget = result.trace.policy.state_budget;
        assert!(
            result.trace.states.len() as u64 <= budget + 1,
            "{} states for budget {budget}",
            result.trace.states.len()
        );
    }
}

/// ACCEPTANCE: INV-PATH
#[test]
fn solved_paths_are_parent_chains_to_the_goal() {
    for result in all_results() {
        let Some(cost) = result.cost() else { continue };
        let last = result.trace.last_step().unwrap();
        let graph = result.trace.graph();
        assert_eq!(last.path.len() as u32, cost + 1);
        assert_eq!(last.path.first(), Some(&1));
        for pair in last.path.windows(2) {
            assert_eq!(graph.get(pair[1]).unwrap().parent, Some(pair[0]));
        }
        let goal = graph.get(*last.path.last().unwrap()).unwrap();
        assert!(goal.grid.is_goal());
        assert_eq!(goal.cost, cost);
    }
}

/// ACCEPTANCE: INV-REPLAY
#[test]
fn every_trace_replays() {
    for result in all_results() {
        verify_trace(&result.trace).unwrap_or_else(|e| panic!("replay failed: {e}"));
    }
}

/// ACCEPTANCE: INV-SNAPSHOT
#[test]
fn each_step_is_a_self_contained_snapshot() {
    let result = solve(&scenarios::six_moves(), &SearchPolicy::default()).unwrap();
    for view in result.trace.views() {
        let step = view.step;
        assert_eq!(view.graph().len(), step.known_states);
        for id in step
            .active_states
            .iter()
            .chain(step.explored_states.iter())
            .chain(step.path.iter())
        {
            assert!(view.graph().contains(*id));
        }
    }
    // Steps recorded before the goal was found must not show its path.
    let first_with_path = result
        .trace
        .steps
        .iter()
        .position(|s| !s.path.is_empty())
        .unwrap();
    assert_eq!(result.trace.steps[first_with_path].phase, Phase::Complete);
}

struct StepCounter(usize);

impl TraceObserver for StepCounter {
    fn on_step(&mut self, _step: &TraceStep, _graph: GraphView<'_>) {
        self.0 += 1;
    }
}

/// ACCEPTANCE: INV-OBSERVER
#[test]
fn observer_does_not_change_the_trace() {
    let grid = scenarios::six_moves();
    let policy = SearchPolicy::default();
    let plain = solve(&grid, &policy).unwrap();

    let mut counter = StepCounter(0);
    let observed = solve_with_observer(&grid, &policy, &mut counter).unwrap();

    assert_eq!(counter.0, plain.trace.len());
    assert_eq!(
        observed.trace.to_canonical_json_bytes().unwrap(),
        plain.trace.to_canonical_json_bytes().unwrap()
    );
}
