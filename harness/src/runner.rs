//! Harness runner: config in, verified report out.
//!
//! # Pipeline
//!
//! ```text
//! preflight::check() → solve() → verify_trace()
//!   → canonical artifacts (config, outcome, trace) → build_bundle()
//! ```
//!
//! The runner never trusts its own trace: it replay-verifies the trace
//! before packaging it.

use fifteen_kernel::proof::canon::canonical_json_bytes;
use fifteen_search::error::SearchError;
use fifteen_search::replay::{verify_trace, ReplayError};
use fifteen_search::search::{solve, SolveOutcome, SolveResult};

use crate::config::RunConfig;
use crate::preflight::{check, PreflightError};
use crate::report::{
    build_bundle, ReportBundle, ReportError, CONFIG_ARTIFACT, OUTCOME_ARTIFACT, TRACE_ARTIFACT,
};

/// Error during a harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The configuration was refused before searching.
    Preflight(PreflightError),
    /// The engine rejected its input.
    Search(SearchError),
    /// The engine's own trace failed replay verification (engine bug).
    Replay(ReplayError),
    /// Canonical JSON serialization failed.
    Canon { detail: String },
    /// Report assembly failed.
    Report(ReportError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preflight(e) => write!(f, "preflight: {e}"),
            Self::Search(e) => write!(f, "search: {e}"),
            Self::Replay(e) => write!(f, "trace verification: {e}"),
            Self::Canon { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::Report(e) => write!(f, "report: {e}"),
        }
    }
}

impl std::error::Error for RunError {}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub config: RunConfig,
    pub result: SolveResult,
    pub bundle: ReportBundle,
}

/// Run one configuration end to end.
///
/// # Errors
///
/// Returns [`RunError`] if preflight refuses the configuration, or if any
/// later stage fails.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    let span = tracing::info_span!("run", budget = config.state_budget);
    let _entered = span.enter();

    check(config).map_err(RunError::Preflight)?;
    let result = solve(&config.tiles, &config.search_policy()).map_err(RunError::Search)?;
    verify_trace(&result.trace).map_err(RunError::Replay)?;

    let trace_bytes = result.trace.to_canonical_json_bytes().map_err(canon)?;
    let trace_digest = result.trace.digest().map_err(canon)?;
    let config_bytes = canonical_json_bytes(&config.to_json()).map_err(canon)?;
    let outcome_bytes =
        canonical_json_bytes(&outcome_json(&result, trace_digest.as_str())).map_err(canon)?;

    let bundle = build_bundle(vec![
        (CONFIG_ARTIFACT.to_string(), config_bytes),
        (OUTCOME_ARTIFACT.to_string(), outcome_bytes),
        (TRACE_ARTIFACT.to_string(), trace_bytes),
    ])
    .map_err(RunError::Report)?;

    tracing::info!(
        solved = result.is_solved(),
        steps = result.trace.len(),
        digest = bundle.digest.as_str(),
        "run complete"
    );
    Ok(RunReport {
        config: *config,
        result,
        bundle,
    })
}

/// The `outcome.json` artifact.
#[must_use]
pub fn outcome_json(result: &SolveResult, trace_digest: &str) -> serde_json::Value {
    let (status, goal, path, cost) = match &result.outcome {
        SolveOutcome::Solved { goal, path, cost } => {
            ("solved", Some(*goal), path.clone(), Some(*cost))
        }
        SolveOutcome::NotFound { .. } => ("not_found", None, Vec::new(), None),
    };
    let stats = result.stats;
    serde_json::json!({
        "cost": cost,
        "goal_state_id": goal,
        "moves": result.moves().iter().map(|d| d.as_str()).collect::<Vec<_>>(),
        "path": path,
        "stats": {
            "duplicates_suppressed": stats.duplicates_suppressed,
            "expansions": stats.expansions,
            "frontier_high_water": stats.frontier_high_water,
            "pruned": stats.pruned,
            "states_created": stats.states_created,
        },
        "status": status,
        "termination": result.termination.as_str(),
        "trace_digest": trace_digest,
        "trace_steps": result.trace.len(),
    })
}

fn canon(e: impl std::fmt::Display) -> RunError {
    RunError::Canon {
        detail: e.to_string(),
    }
}
