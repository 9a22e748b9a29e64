//! Search entry point and expansion loop.

use fifteen_kernel::board::grid::{neighbor_moves, Direction, Grid};
use fifteen_kernel::board::heuristic::manhattan;

use crate::contract::{NoopObserver, TraceObserver};
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::graph::StateGraph;
use crate::node::{FrontierKey, PuzzleState, StateId, ROOT_STATE_ID};
use crate::policy::{GoalPolicy, SearchPolicy};
use crate::trace::{Phase, Trace};
use crate::trace_writer::TraceWriter;

/// Why the search loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// A goal was selected under [`GoalPolicy::FirstGoal`].
    GoalReached,
    /// The frontier emptied.
    FrontierExhausted,
    /// The state budget was used up with states still open.
    StateBudgetExhausted,
}

impl TerminationReason {
    /// Stable snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoalReached => "goal_reached",
            Self::FrontierExhausted => "frontier_exhausted",
            Self::StateBudgetExhausted => "state_budget_exhausted",
        }
    }
}

/// What the search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A goal was found. `path` runs root-first and ends at `goal`.
    Solved {
        goal: StateId,
        path: Vec<StateId>,
        cost: u32,
    },
    /// No goal was found. This is not a proof of unsolvability: the budget
    /// may simply have been too small.
    NotFound { reason: TerminationReason },
}

/// Aggregate counters for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States in the final graph, root included.
    pub states_created: u64,
    /// States popped from the frontier.
    pub expansions: u64,
    /// Generated configurations skipped because they were already visited.
    pub duplicates_suppressed: u64,
    /// States discarded by the bound test.
    pub pruned: u64,
    /// Largest frontier size observed.
    pub frontier_high_water: u64,
}

/// Result of a search execution.
///
/// Always carries a complete trace regardless of how the search terminated.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub outcome: SolveOutcome,
    pub termination: TerminationReason,
    pub stats: SearchStats,
    pub trace: Trace,
}

impl SolveResult {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, SolveOutcome::Solved { .. })
    }

    /// Solution length in moves, if solved.
    #[must_use]
    pub fn cost(&self) -> Option<u32> {
        match &self.outcome {
            SolveOutcome::Solved { cost, .. } => Some(*cost),
            SolveOutcome::NotFound { .. } => None,
        }
    }

    /// Blank moves along the solution path, root-first. Empty if unsolved.
    #[must_use]
    pub fn moves(&self) -> Vec<Direction> {
        let SolveOutcome::Solved { path, .. } = &self.outcome else {
            return Vec::new();
        };
        let graph = self.trace.graph();
        path.iter()
            .filter_map(|&id| graph.get(id)?.producing_move)
            .map(|m| m.direction)
            .collect()
    }
}

/// Run branch-and-bound search from `initial`.
///
/// See [`solve_with_observer`].
///
/// # Errors
///
/// Returns [`SearchError`] only for pre-flight failures.
pub fn solve(initial: &Grid, policy: &SearchPolicy) -> Result<SolveResult, SearchError> {
    solve_with_observer(initial, policy, &mut NoopObserver)
}

/// Run branch-and-bound search, delivering each trace step to `observer`
/// as it is emitted.
///
/// All runtime terminations (goal found, frontier exhausted, budget
/// exhausted) return `Ok(SolveResult)` with the trace preserved.
///
/// # Errors
///
/// Returns [`SearchError::ZeroStateBudget`] or [`SearchError::MissingBlank`]
/// before any state is created.
pub fn solve_with_observer(
    initial: &Grid,
    policy: &SearchPolicy,
    observer: &mut dyn TraceObserver,
) -> Result<SolveResult, SearchError> {
    policy.validate()?;
    let blank = initial.find_blank().ok_or(SearchError::MissingBlank)?;

    let span = tracing::info_span!(
        "solve",
        state_budget = policy.state_budget,
        goal_policy = policy.goal_policy.as_str()
    );
    let _entered = span.enter();

    let mut session = Session {
        policy: *policy,
        graph: StateGraph::new(),
        frontier: Frontier::new(),
        writer: TraceWriter::new(observer),
        stats: SearchStats::default(),
        generated: 0,
    };

    let heuristic = manhattan(initial);
    let root = session.graph.insert_root(*initial, blank, heuristic);
    session.frontier.mark_visited(initial.canonical_key());
    session
        .frontier
        .push(FrontierKey::from(session.graph.state(root)));
    session.record(
        Phase::Init,
        format!("Initialize with initial state. Manhattan distance heuristic: {heuristic}"),
        root,
    );

    let termination = session.run();
    Ok(session.finish(termination))
}

/// Per-call search state. Nothing here outlives one `solve` invocation.
struct Session<'o> {
    policy: SearchPolicy,
    graph: StateGraph,
    frontier: Frontier,
    writer: TraceWriter<'o>,
    stats: SearchStats,
    /// States created after the root; compared against the budget.
    generated: u64,
}

impl Session<'_> {
    fn record(&mut self, phase: Phase, description: String, current: StateId) {
        self.writer
            .record(phase, description, current, &self.graph, &self.frontier);
    }

    fn budget_left(&self) -> bool {
        self.generated < self.policy.state_budget
    }

    fn run(&mut self) -> TerminationReason {
        loop {
            if !self.budget_left() {
                return TerminationReason::StateBudgetExhausted;
            }
            let Some(key) = self.frontier.pop() else {
                return TerminationReason::FrontierExhausted;
            };
            let current = self.graph.state(key.id).clone();
            self.stats.expansions += 1;
            self.writer.mark_explored(current.id);
            tracing::debug!(
                state = current.id,
                total_cost = current.total_cost(),
                open = self.frontier.len(),
                "select"
            );
            self.record(
                Phase::Branch,
                format!(
                    "Select state {} with lowest total cost ({})",
                    current.id,
                    current.total_cost()
                ),
                current.id,
            );

            if current.grid.is_goal() {
                match self.policy.goal_policy {
                    GoalPolicy::FirstGoal => {
                        self.accept_goal(&current);
                        return TerminationReason::GoalReached;
                    }
                    GoalPolicy::ExhaustFrontier => {
                        self.offer_incumbent(&current);
                        continue;
                    }
                }
            }

            self.expand(&current);
        }
    }

    /// Accept `goal` as final and emit the completing step.
    fn accept_goal(&mut self, goal: &PuzzleState) {
        let path = self.graph.view().path_to(goal.id);
        self.writer.set_best(goal.id, path);
        tracing::debug!(state = goal.id, cost = goal.cost, "goal accepted");
        self.record(
            Phase::Complete,
            format!("Solution found! Total moves: {}", goal.cost),
            goal.id,
        );
    }

    /// Replace the incumbent if `goal` is cheaper. Goals are never expanded.
    fn offer_incumbent(&mut self, goal: &PuzzleState) {
        let improves = self
            .writer
            .best()
            .is_none_or(|best| goal.cost < self.graph.state(best).cost);
        if !improves {
            return;
        }
        let path = self.graph.view().path_to(goal.id);
        self.writer.set_best(goal.id, path);
        tracing::debug!(state = goal.id, cost = goal.cost, "incumbent updated");
        self.record(
            Phase::Update,
            format!(
                "New best solution: state {} with {} moves",
                goal.id, goal.cost
            ),
            goal.id,
        );
    }

    fn expand(&mut self, current: &PuzzleState) {
        for mv in neighbor_moves(current.blank_pos) {
            if !self.budget_left() {
                break;
            }
            let (grid, moved_tile) = current.grid.apply_move(current.blank_pos, mv.target);
            if !self.frontier.mark_visited(grid.canonical_key()) {
                self.stats.duplicates_suppressed += 1;
                continue;
            }

            let heuristic = manhattan(&grid);
            let id = self
                .graph
                .insert_child(current, grid, mv, moved_tile, heuristic);
            self.generated += 1;
            let child = self.graph.state(id);
            let (cost, total_cost) = (child.cost, child.total_cost());
            self.record(
                Phase::Branch,
                format!(
                    "Blank moves {} (tile {moved_tile}). New state {id} with cost {cost} + heuristic {heuristic} = {total_cost}",
                    mv.direction
                ),
                id,
            );

            if let Some(bound) = self.writer.best().map(|b| self.graph.state(b).cost) {
                if total_cost >= bound {
                    self.writer.mark_pruned(id);
                    self.stats.pruned += 1;
                    tracing::trace!(state = id, total_cost, bound, "prune");
                    self.record(
                        Phase::Prune,
                        format!(
                            "Prune state {id} as its total cost ({total_cost}) is not better than current best ({bound})"
                        ),
                        id,
                    );
                    continue;
                }
            }

            self.frontier.push(FrontierKey { total_cost, id });
            tracing::trace!(state = id, total_cost, "enqueue");
            self.record(
                Phase::Bound,
                format!("Add state {id} to queue with total cost {total_cost}"),
                id,
            );
        }
    }

    fn finish(mut self, termination: TerminationReason) -> SolveResult {
        let outcome = match self.writer.best() {
            Some(goal) => {
                let path = self.graph.view().path_to(goal);
                let cost = self.graph.state(goal).cost;
                if termination != TerminationReason::GoalReached {
                    self.record(
                        Phase::Complete,
                        format!(
                            "Search finished ({}). Best solution: {cost} moves",
                            termination.as_str()
                        ),
                        goal,
                    );
                }
                SolveOutcome::Solved { goal, path, cost }
            }
            None => {
                let current = self.writer.last_current().unwrap_or(ROOT_STATE_ID);
                self.record(
                    Phase::Complete,
                    "No solution found within the search limit.".to_string(),
                    current,
                );
                SolveOutcome::NotFound {
                    reason: termination,
                }
            }
        };

        self.stats.states_created = self.graph.len() as u64;
        self.stats.frontier_high_water = self.frontier.high_water() as u64;
        tracing::info!(
            termination = termination.as_str(),
            states = self.stats.states_created,
            expansions = self.stats.expansions,
            steps = self.writer.step_count(),
            "search finished"
        );

        let stats = self.stats;
        let trace = self.writer.finish(self.graph, self.policy);
        SolveResult {
            outcome,
            termination,
            stats,
            trace,
        }
    }
}
