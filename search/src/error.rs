//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Runtime terminations
//! (goal reached, frontier exhausted, state budget exhausted) are expressed
//! via [`crate::search::TerminationReason`] and always produce a complete
//! [`crate::trace::Trace`].

/// Typed failure for pre-flight search validation.
///
/// These errors are returned before the root state is created. No trace is
/// produced because no search steps were taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The policy allows zero generated states, so the search could never run.
    ZeroStateBudget,
    /// The initial grid has no blank cell. Only reachable by bypassing the
    /// validating grid constructors.
    MissingBlank,
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroStateBudget => write!(f, "state budget must be at least 1"),
            Self::MissingBlank => write!(f, "initial grid has no blank cell"),
        }
    }
}

impl std::error::Error for SearchError {}
