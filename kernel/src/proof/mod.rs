//! Proof module: canonical JSON bytes and domain-separated content hashing.
//!
//! Everything that is digested (traces, run artifacts, report digests) goes
//! through these two modules so that identical searches produce identical
//! bytes across processes.

pub mod canon;
pub mod hash;
