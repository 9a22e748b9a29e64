//! `read_trace()`: fail-closed parsing of a serialized trace.
//!
//! Accepts exactly the JSON that [`Trace::to_canonical_json_bytes`] produces.
//! Unknown or missing keys, grids that are not permutations, and ids that
//! are not dense are all rejected, so re-serializing a parsed trace gives
//! back the same bytes.

use std::sync::Arc;

use serde_json::{Map, Value};

use fifteen_kernel::board::grid::{Direction, Grid, Position};

use crate::node::{PuzzleState, StateId, StateMove};
use crate::policy::{GoalPolicy, SearchPolicy};
use crate::trace::{Phase, Trace, TraceStep, TRACE_SCHEMA};

const TRACE_KEYS: &[&str] = &["policy", "schema", "states", "steps"];
const POLICY_KEYS: &[&str] = &["goal_policy", "state_budget"];
const STATE_KEYS: &[&str] = &[
    "blank_pos",
    "cost",
    "grid",
    "heuristic",
    "id",
    "move",
    "moved_tile",
    "parent",
    "total_cost",
];
const STEP_KEYS: &[&str] = &[
    "active_states",
    "best_state_id",
    "current_state_id",
    "description",
    "explored_states",
    "known_states",
    "path",
    "phase",
    "pruned_states",
    "seq",
];

/// Why a serialized trace was rejected. `at` is a JSON path such as
/// `$.states[3]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceReadError {
    InvalidJson(String),
    UnsupportedSchema { got: String },
    MissingField { at: String, field: &'static str },
    UnknownField { at: String, field: String },
    InvalidField {
        at: String,
        field: &'static str,
        detail: String,
    },
}

impl std::fmt::Display for TraceReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(detail) => write!(f, "invalid trace JSON: {detail}"),
            Self::UnsupportedSchema { got } => write!(f, "unsupported trace schema: {got}"),
            Self::MissingField { at, field } => write!(f, "{at}: missing field `{field}`"),
            Self::UnknownField { at, field } => write!(f, "{at}: unknown field `{field}`"),
            Self::InvalidField { at, field, detail } => {
                write!(f, "{at}.{field}: {detail}")
            }
        }
    }
}

impl std::error::Error for TraceReadError {}

/// Parse a trace from its serialized JSON bytes.
///
/// Structural parsing only. Use [`crate::replay::verify_trace`] to check that
/// the parsed trace is internally consistent.
///
/// # Errors
///
/// Returns [`TraceReadError`] on malformed input.
pub fn read_trace(bytes: &[u8]) -> Result<Trace, TraceReadError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| TraceReadError::InvalidJson(e.to_string()))?;
    let root = Obj::new(&value, "$".to_string())?;
    root.expect_keys(TRACE_KEYS)?;

    let schema = root.str("schema")?;
    if schema != TRACE_SCHEMA {
        return Err(TraceReadError::UnsupportedSchema {
            got: schema.to_string(),
        });
    }

    let policy = parse_policy(&Obj::new(root.get("policy")?, "$.policy".to_string())?)?;

    let states = root
        .array("states")?
        .iter()
        .enumerate()
        .map(|(i, v)| parse_state(&Obj::new(v, format!("$.states[{i}]"))?, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut steps: Vec<TraceStep> = Vec::new();
    for (i, v) in root.array("steps")?.iter().enumerate() {
        let step = parse_step(&Obj::new(v, format!("$.steps[{i}]"))?, steps.last())?;
        steps.push(step);
    }

    Ok(Trace {
        states: Arc::from(states),
        steps,
        policy,
    })
}

fn parse_policy(obj: &Obj<'_>) -> Result<SearchPolicy, TraceReadError> {
    obj.expect_keys(POLICY_KEYS)?;
    let name = obj.str("goal_policy")?;
    let goal_policy =
        GoalPolicy::from_name(name).ok_or_else(|| obj.invalid("goal_policy", name))?;
    Ok(SearchPolicy {
        state_budget: obj.u64("state_budget")?,
        goal_policy,
    })
}

fn parse_state(obj: &Obj<'_>, index: usize) -> Result<PuzzleState, TraceReadError> {
    obj.expect_keys(STATE_KEYS)?;
    let id = obj.u64("id")?;
    if id != index as StateId + 1 {
        return Err(obj.invalid("id", format!("expected {}, got {id}", index + 1)));
    }

    let mut cells = Vec::new();
    for row in obj.array("grid")? {
        let row = row
            .as_array()
            .ok_or_else(|| obj.invalid("grid", "rows must be arrays"))?;
        for cell in row {
            cells.push(
                cell.as_i64()
                    .ok_or_else(|| obj.invalid("grid", "cells must be integers"))?,
            );
        }
    }
    let grid = Grid::from_tiles(&cells).map_err(|e| obj.invalid("grid", e.to_string()))?;

    let blank_pos = match obj.array("blank_pos")?.as_slice() {
        [row, col] => row
            .as_u64()
            .zip(col.as_u64())
            .and_then(|(r, c)| Position::new(u8::try_from(r).ok()?, u8::try_from(c).ok()?)),
        _ => None,
    }
    .ok_or_else(|| obj.invalid("blank_pos", "expected [row, col] on the board"))?;

    let direction = obj.opt("move")?.map(|v| {
        v.as_str()
            .and_then(Direction::from_name)
            .ok_or_else(|| obj.invalid("move", "unknown direction"))
    });
    let moved_tile = obj.opt("moved_tile")?.map(|v| {
        v.as_u64()
            .and_then(|t| u8::try_from(t).ok())
            .ok_or_else(|| obj.invalid("moved_tile", "expected a tile value"))
    });
    let producing_move = match (direction.transpose()?, moved_tile.transpose()?) {
        (Some(direction), Some(moved_tile)) => Some(StateMove {
            direction,
            moved_tile,
        }),
        (None, None) => None,
        _ => return Err(obj.invalid("move", "move and moved_tile must both be set or both null")),
    };

    let state = PuzzleState {
        id,
        grid,
        blank_pos,
        cost: obj.u32("cost")?,
        heuristic: obj.u32("heuristic")?,
        parent: obj.opt("parent")?.map(|_| obj.u64("parent")).transpose()?,
        producing_move,
    };
    if u64::from(state.total_cost()) != obj.u64("total_cost")? {
        return Err(obj.invalid("total_cost", "is not cost + heuristic"));
    }
    Ok(state)
}

fn parse_step(obj: &Obj<'_>, prev: Option<&TraceStep>) -> Result<TraceStep, TraceReadError> {
    obj.expect_keys(STEP_KEYS)?;
    let name = obj.str("phase")?;
    let phase = Phase::from_name(name).ok_or_else(|| obj.invalid("phase", name))?;
    let known_states = usize::try_from(obj.u64("known_states")?)
        .map_err(|e| obj.invalid("known_states", e.to_string()))?;

    Ok(TraceStep {
        seq: obj.u64("seq")?,
        phase,
        description: obj.str("description")?.to_string(),
        current_state_id: obj.u64("current_state_id")?,
        best_state_id: obj
            .opt("best_state_id")?
            .map(|_| obj.u64("best_state_id"))
            .transpose()?,
        known_states,
        active_states: obj.ids("active_states")?,
        explored_states: shared(obj.ids("explored_states")?, prev.map(|p| &p.explored_states)),
        pruned_states: shared(obj.ids("pruned_states")?, prev.map(|p| &p.pruned_states)),
        path: shared(obj.ids("path")?, prev.map(|p| &p.path)),
    })
}

/// Reuse the previous step's allocation when the list did not change.
fn shared(ids: Vec<StateId>, prev: Option<&Arc<[StateId]>>) -> Arc<[StateId]> {
    match prev {
        Some(p) if **p == *ids => Arc::clone(p),
        _ => Arc::from(ids),
    }
}

/// A JSON object plus the path it was found at, for error reporting.
struct Obj<'a> {
    map: &'a Map<String, Value>,
    at: String,
}

impl<'a> Obj<'a> {
    fn new(value: &'a Value, at: String) -> Result<Self, TraceReadError> {
        match value.as_object() {
            Some(map) => Ok(Self { map, at }),
            None => Err(TraceReadError::InvalidField {
                at,
                field: "",
                detail: "expected an object".to_string(),
            }),
        }
    }

    fn expect_keys(&self, allowed: &[&str]) -> Result<(), TraceReadError> {
        if let Some(key) = self.map.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(TraceReadError::UnknownField {
                at: self.at.clone(),
                field: key.clone(),
            });
        }
        Ok(())
    }

    fn invalid(&self, field: &'static str, detail: impl Into<String>) -> TraceReadError {
        TraceReadError::InvalidField {
            at: self.at.clone(),
            field,
            detail: detail.into(),
        }
    }

    fn get(&self, field: &'static str) -> Result<&'a Value, TraceReadError> {
        self.map.get(field).ok_or_else(|| TraceReadError::MissingField {
            at: self.at.clone(),
            field,
        })
    }

    /// A present field that may be `null`.
    fn opt(&self, field: &'static str) -> Result<Option<&'a Value>, TraceReadError> {
        let value = self.get(field)?;
        Ok((!value.is_null()).then_some(value))
    }

    fn str(&self, field: &'static str) -> Result<&'a str, TraceReadError> {
        self.get(field)?
            .as_str()
            .ok_or_else(|| self.invalid(field, "expected a string"))
    }

    fn u64(&self, field: &'static str) -> Result<u64, TraceReadError> {
        self.get(field)?
            .as_u64()
            .ok_or_else(|| self.invalid(field, "expected a non-negative integer"))
    }

    fn u32(&self, field: &'static str) -> Result<u32, TraceReadError> {
        u32::try_from(self.u64(field)?).map_err(|e| self.invalid(field, e.to_string()))
    }

    fn array(&self, field: &'static str) -> Result<&'a Vec<Value>, TraceReadError> {
        self.get(field)?
            .as_array()
            .ok_or_else(|| self.invalid(field, "expected an array"))
    }

    fn ids(&self, field: &'static str) -> Result<Vec<StateId>, TraceReadError> {
        self.array(field)?
            .iter()
            .map(|v| {
                v.as_u64()
                    .ok_or_else(|| self.invalid(field, "expected state ids"))
            })
            .collect()
    }
}
