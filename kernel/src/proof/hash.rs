//! Canonical hashing types and domain separation.
//!
//! Algorithm: SHA-256. Every digest is computed over
//! `domain_prefix || data`, where each prefix is null-terminated, so bytes
//! hashed for one purpose can never collide with bytes hashed for another.
//!
//! **Exactly one place defines canonical hashing**: [`canonical_hash`].

use sha2::{Digest, Sha256};

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`)
///
/// Invariant: exactly one `:` separator with non-empty text on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format.
    ///
    /// Returns `None` if the colon is missing, repeated, or at either end.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon == s.len() - 1 || s[colon + 1..].contains(':') {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm portion (e.g., "sha256").
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    /// The full `"algorithm:hex_digest"` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// Hash domains used across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HashDomain {
    /// A complete search trace (canonical JSON).
    SearchTrace,
    /// A single run artifact (config, outcome, trace file bytes).
    RunArtifact,
    /// The digest basis binding all artifacts of one run.
    RunReport,
}

impl HashDomain {
    /// Null-terminated domain prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static [u8] {
        match self {
            Self::SearchTrace => b"FIFTEEN::SEARCH_TRACE::V1\0",
            Self::RunArtifact => b"FIFTEEN::RUN_ARTIFACT::V1\0",
            Self::RunReport => b"FIFTEEN::RUN_REPORT::V1\0",
        }
    }

    /// All domains, for exhaustiveness checks.
    pub const ALL: [HashDomain; 3] = [Self::SearchTrace, Self::RunArtifact, Self::RunReport];
}

/// Compute the canonical hash of `data` under `domain`.
///
/// Result format: `"sha256:<64 lowercase hex chars>"`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.prefix());
    hasher.update(data);
    let hex_digest = hex::encode(hasher.finalize());
    let full = format!("sha256:{hex_digest}");
    ContentHash {
        colon: "sha256".len(),
        full,
    }
}
