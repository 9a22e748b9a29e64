//! Fifteen Kernel: the deterministic core of the 15-puzzle solver.
//!
//! # API Surface
//!
//! - [`board::grid`] -- immutable 4×4 tile arrangement, legal blank moves, canonical keys
//! - [`board::heuristic::manhattan`] -- Manhattan distance of a grid to the goal
//! - [`board::parity::is_solvable`] -- inversion-parity solvability check (pre-search collaborator)
//! - [`proof::canon::canonical_json_bytes`] -- the single canonical JSON writer
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashing
//!
//! # Module Dependency Direction
//!
//! `board` ← `proof`
//!
//! `board` depends on nothing internal. `proof` only hashes and serializes
//! bytes; it never inspects grids.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod proof;
