//! Shared fixtures for the lock tests and the `trace_fixture` binary.

pub mod scenarios;
