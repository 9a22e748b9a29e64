//! Pre-execution checks. Nothing here runs the search.
//!
//! The engine itself never refuses an unsolvable grid: it exhausts its
//! budget and reports `NotFound`. Callers that know better reject such grids
//! here, before spending the budget.

use fifteen_kernel::board::parity::{inversions, is_solvable};
use fifteen_search::error::SearchError;

use crate::config::RunConfig;

/// A configuration that must not be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightError {
    /// The goal is unreachable from the starting grid.
    Unsolvable { inversions: u32, blank_row: u8 },
    /// The search policy itself is invalid.
    Policy(SearchError),
}

impl std::fmt::Display for PreflightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsolvable {
                inversions,
                blank_row,
            } => write!(
                f,
                "puzzle is not solvable ({inversions} inversions, blank on row {blank_row})"
            ),
            Self::Policy(e) => write!(f, "invalid search policy: {e}"),
        }
    }
}

impl std::error::Error for PreflightError {}

/// Check a configuration before running it.
///
/// # Errors
///
/// Returns [`PreflightError::Policy`] for an invalid policy, and
/// [`PreflightError::Unsolvable`] when `require_solvable` is set and the
/// grid fails the parity test.
pub fn check(config: &RunConfig) -> Result<(), PreflightError> {
    config
        .search_policy()
        .validate()
        .map_err(PreflightError::Policy)?;

    if config.require_solvable && !is_solvable(&config.tiles) {
        let blank_row = config.tiles.find_blank().map_or(0, |p| p.row);
        tracing::debug!(blank_row, "preflight rejected unsolvable grid");
        return Err(PreflightError::Unsolvable {
            inversions: inversions(&config.tiles),
            blank_row,
        });
    }
    Ok(())
}
