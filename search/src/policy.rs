//! Search policy types.

use crate::error::SearchError;

/// Default cap on generated (non-root) states.
pub const DEFAULT_STATE_BUDGET: u64 = 1000;

/// Search budget and termination configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Hard cap on states generated after the root.
    pub state_budget: u64,
    /// What happens when a goal state is selected.
    pub goal_policy: GoalPolicy,
}

impl SearchPolicy {
    /// Policy with the given budget and the default goal policy.
    #[must_use]
    pub fn with_budget(state_budget: u64) -> Self {
        Self {
            state_budget,
            ..Self::default()
        }
    }

    /// Validate the policy before a search starts.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ZeroStateBudget`] if `state_budget` is 0.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.state_budget == 0 {
            return Err(SearchError::ZeroStateBudget);
        }
        Ok(())
    }

    /// JSON echo embedded in every serialized trace.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "goal_policy": self.goal_policy.as_str(),
            "state_budget": self.state_budget,
        })
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            state_budget: DEFAULT_STATE_BUDGET,
            goal_policy: GoalPolicy::FirstGoal,
        }
    }
}

/// Termination rule applied when the selected state is a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalPolicy {
    /// Accept the first goal popped from the frontier and stop.
    ///
    /// Not guaranteed cost-minimal: the visited set keeps the first path
    /// that discovers a configuration, even if a cheaper one exists.
    #[default]
    FirstGoal,
    /// Record each cheaper goal as the incumbent and keep searching until
    /// the frontier or the budget runs out, pruning children whose total
    /// cost is not below the incumbent's cost.
    ExhaustFrontier,
}

impl GoalPolicy {
    /// Stable snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstGoal => "first_goal",
            Self::ExhaustFrontier => "exhaust_frontier",
        }
    }

    /// Parse a name produced by [`GoalPolicy::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "first_goal" => Some(Self::FirstGoal),
            "exhaust_frontier" => Some(Self::ExhaustFrontier),
            _ => None,
        }
    }
}
