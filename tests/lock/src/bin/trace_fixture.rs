//! Binary that solves the fixed scenarios and prints deterministic output
//! lines for cross-process verification.
//!
//! Usage: `trace_fixture`
//!
//! Output: `key=value` lines, one block per scenario and goal policy.

use fifteen_harness::config::RunConfig;
use fifteen_harness::runner::run;
use fifteen_kernel::board::grid::Grid;
use fifteen_search::policy::GoalPolicy;
use lock_tests::scenarios;

fn main() {
    let cases: [(&str, Grid, bool); 4] = [
        ("goal", scenarios::goal(), true),
        ("one_move", scenarios::one_move(), true),
        ("swapped_pair", scenarios::swapped_pair(), false),
        ("six_moves", scenarios::six_moves(), true),
    ];
    for (name, grid, require_solvable) in cases {
        for goal_policy in [GoalPolicy::FirstGoal, GoalPolicy::ExhaustFrontier] {
            let mut config = RunConfig::new(grid);
            config.goal_policy = goal_policy;
            config.require_solvable = require_solvable;
            config.state_budget = 500;
            let report = run(&config).expect("run failed");
            let trace_digest = report.result.trace.digest().expect("trace digest");

            let key = format!("{name}.{}", goal_policy.as_str());
            println!("{key}.report_digest={}", report.bundle.digest);
            println!("{key}.trace_digest={trace_digest}");
            println!("{key}.termination={}", report.result.termination.as_str());
            println!("{key}.steps={}", report.result.trace.len());
            println!("{key}.states={}", report.result.stats.states_created);
        }
    }
}
