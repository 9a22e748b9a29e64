//! Fifteen Harness: run orchestration around the search engine.
//!
//! The harness turns a [`config::RunConfig`] into a verified
//! [`runner::RunReport`]: preflight checks, the search itself, replay
//! verification of the trace, and packaging into content-addressed
//! artifacts that can be written to disk and re-verified later.
//!
//! The harness does NOT implement search logic. It delegates to
//! `fifteen_search` and hashes with `fifteen_kernel`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod preflight;
pub mod report;
pub mod report_dir;
pub mod runner;
