//! Fifteen Search: deterministic branch-and-bound search with a replayable trace.
//!
//! This crate provides the search layer for the 15-puzzle. It depends only on
//! `fifteen_kernel`. It does NOT depend on `fifteen_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! fifteen_kernel  ←  fifteen_search  ←  fifteen_harness
//! (grid, hashing)    (engine, trace)     (config, runner, CLI)
//! ```
//!
//! # Key types
//!
//! - [`PuzzleState`](node::PuzzleState) -- immutable search node with parent link
//! - [`StateGraph`](graph::StateGraph) -- append-only state arena keyed by id
//! - [`Frontier`](frontier::Frontier) -- ranked open list plus visited set
//! - [`SearchPolicy`](policy::SearchPolicy) -- state budget and goal policy
//! - [`Trace`](trace::Trace) -- ordered, self-contained step snapshots
//! - [`TraceObserver`](contract::TraceObserver) -- optional step-by-step delivery
//! - [`solve`](search::solve) -- the entry point

#![forbid(unsafe_code)]

pub mod contract;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod node;
pub mod policy;
pub mod replay;
pub mod search;
pub mod trace;
pub mod trace_reader;
pub mod trace_writer;
