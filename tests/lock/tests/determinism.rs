//! Determinism: identical input and policy must give a byte-identical trace.
//!
//! In-process: N=10 repeated solves per scenario.
//! Cross-process: the `trace_fixture` binary under several environment
//! variants must print identical output.

use std::path::Path;
use std::process::Command;

use fifteen_search::policy::{GoalPolicy, SearchPolicy};
use fifteen_search::search::solve;
use lock_tests::scenarios;

// ---------------------------------------------------------------------------
// In-process
// ---------------------------------------------------------------------------

/// ACCEPTANCE: DET-001-INPROC
#[test]
fn trace_bytes_identical_n10() {
    for grid in scenarios::corpus() {
        for goal_policy in [GoalPolicy::FirstGoal, GoalPolicy::ExhaustFrontier] {
            let policy = SearchPolicy {
                state_budget: 400,
                goal_policy,
            };
            let first = solve(&grid, &policy).unwrap();
            let first_bytes = first.trace.to_canonical_json_bytes().unwrap();
            for i in 1..10 {
                let again = solve(&grid, &policy).unwrap();
                assert_eq!(again.outcome, first.outcome, "outcome differed on run {i}");
                assert_eq!(
                    again.trace.to_canonical_json_bytes().unwrap(),
                    first_bytes,
                    "trace bytes differed on run {i} for {grid:?}"
                );
            }
        }
    }
}

/// ACCEPTANCE: DET-001-INPROC
#[test]
fn step_descriptions_identical() {
    let a = solve(&scenarios::six_moves(), &SearchPolicy::default()).unwrap();
    let b = solve(&scenarios::six_moves(), &SearchPolicy::default()).unwrap();
    let describe = |r: &fifteen_search::search::SolveResult| -> Vec<String> {
        r.trace.steps.iter().map(|s| s.description.clone()).collect()
    };
    assert_eq!(describe(&a), describe(&b));
}

// ---------------------------------------------------------------------------
// Cross-process
// ---------------------------------------------------------------------------

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

/// Run the fixture binary with the given cwd and environment overrides.
fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_trace_fixture");
    let mut command = Command::new(bin);
    command
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LANG")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "trace_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

/// ACCEPTANCE: DET-002-CROSSPROC
#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(baseline.contains("one_move.first_goal.report_digest=sha256:"));
    assert!(baseline.contains("one_move.first_goal.termination=goal_reached"));
    assert!(baseline.contains("swapped_pair.first_goal.termination=state_budget_exhausted"));
    assert!(baseline.contains("swapped_pair.first_goal.states=501"));

    let alt_cwd = std::env::temp_dir();
    let variant_cwd = run_variant(&alt_cwd.to_string_lossy(), &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes");

    let variant_locale = run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    let variant_noise = run_variant(
        &root,
        &[
            ("FIFTEEN_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("RUST_LOG", "trace"),
        ],
    );
    assert_eq!(baseline, variant_noise, "output differs with spurious env vars");
}
