//! Board module: grid model, heuristic evaluation, solvability parity.

pub mod grid;
pub mod heuristic;
pub mod parity;
