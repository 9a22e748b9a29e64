//! Run configuration: what to solve and under which policy.
//!
//! Parsed from a small JSON object. Missing keys take defaults; unknown keys
//! are rejected so a typo never silently falls back to a default.
//!
//! ```text
//! {
//!   "tiles": [1, 2, ..., 0] | "1,2,...,0",
//!   "state_budget": 1000,
//!   "goal_policy": "first_goal" | "exhaust_frontier",
//!   "require_solvable": true
//! }
//! ```

use fifteen_kernel::board::grid::{Grid, GridError};
use fifteen_search::policy::{GoalPolicy, SearchPolicy, DEFAULT_STATE_BUDGET};

const KNOWN_KEYS: &[&str] = &["goal_policy", "require_solvable", "state_budget", "tiles"];

/// Fully resolved run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub tiles: Grid,
    pub state_budget: u64,
    pub goal_policy: GoalPolicy,
    /// Refuse puzzles whose permutation parity makes the goal unreachable.
    pub require_solvable: bool,
}

/// Error parsing a run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Input is not valid JSON.
    InvalidJson { detail: String },
    /// Top-level value is not an object.
    NotAnObject,
    /// A key outside the known set was present.
    UnknownKey { key: String },
    /// A required key was absent.
    MissingKey { key: &'static str },
    /// A key had the wrong type or an unrecognized value.
    InvalidValue { key: &'static str, detail: String },
    /// The tiles do not form a valid grid.
    Grid(GridError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson { detail } => write!(f, "config is not valid JSON: {detail}"),
            Self::NotAnObject => write!(f, "config must be a JSON object"),
            Self::UnknownKey { key } => write!(f, "unknown config key: {key}"),
            Self::MissingKey { key } => write!(f, "missing config key: {key}"),
            Self::InvalidValue { key, detail } => write!(f, "config key {key}: {detail}"),
            Self::Grid(e) => write!(f, "config key tiles: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl RunConfig {
    /// Configuration with default policy for the given grid.
    #[must_use]
    pub fn new(tiles: Grid) -> Self {
        Self {
            tiles,
            state_budget: DEFAULT_STATE_BUDGET,
            goal_policy: GoalPolicy::default(),
            require_solvable: true,
        }
    }

    /// Parse from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON, unknown keys, a missing
    /// `tiles` key, or values of the wrong shape.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::InvalidJson {
                detail: e.to_string(),
            })?;
        let map = value.as_object().ok_or(ConfigError::NotAnObject)?;
        if let Some(key) = map.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(ConfigError::UnknownKey { key: key.clone() });
        }

        let tiles = parse_tiles(map.get("tiles").ok_or(ConfigError::MissingKey { key: "tiles" })?)?;
        let mut config = Self::new(tiles);

        if let Some(v) = map.get("state_budget") {
            config.state_budget = v.as_u64().ok_or_else(|| ConfigError::InvalidValue {
                key: "state_budget",
                detail: "expected a non-negative integer".into(),
            })?;
        }
        if let Some(v) = map.get("goal_policy") {
            let name = v.as_str().unwrap_or_default();
            config.goal_policy =
                GoalPolicy::from_name(name).ok_or_else(|| ConfigError::InvalidValue {
                    key: "goal_policy",
                    detail: format!("expected \"first_goal\" or \"exhaust_frontier\", got {v}"),
                })?;
        }
        if let Some(v) = map.get("require_solvable") {
            config.require_solvable = v.as_bool().ok_or_else(|| ConfigError::InvalidValue {
                key: "require_solvable",
                detail: "expected a boolean".into(),
            })?;
        }
        Ok(config)
    }

    /// The engine policy this configuration selects.
    #[must_use]
    pub fn search_policy(&self) -> SearchPolicy {
        SearchPolicy {
            state_budget: self.state_budget,
            goal_policy: self.goal_policy,
        }
    }

    /// Canonical echo of the resolved configuration (tiles always as an array).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "goal_policy": self.goal_policy.as_str(),
            "require_solvable": self.require_solvable,
            "state_budget": self.state_budget,
            "tiles": self.tiles.tiles().as_slice(),
        })
    }
}

fn parse_tiles(value: &serde_json::Value) -> Result<Grid, ConfigError> {
    match value {
        serde_json::Value::String(csv) => Ok(Grid::parse_csv(csv)?),
        serde_json::Value::Array(cells) => {
            let cells = cells
                .iter()
                .map(|c| {
                    c.as_i64().ok_or_else(|| ConfigError::InvalidValue {
                        key: "tiles",
                        detail: format!("expected integer cells, got {c}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Grid::from_tiles(&cells)?)
        }
        other => Err(ConfigError::InvalidValue {
            key: "tiles",
            detail: format!("expected an array or a comma-separated string, got {other}"),
        }),
    }
}
