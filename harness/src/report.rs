//! In-memory run report: the artifacts of one harness run plus their digest.
//!
//! No file I/O in this module (see [`crate::report_dir`] for persistence).
//!
//! # Artifacts
//!
//! | name           | content                                          |
//! |----------------|--------------------------------------------------|
//! | `config.json`  | resolved [`crate::config::RunConfig`]            |
//! | `outcome.json` | outcome, statistics, and the trace digest        |
//! | `trace.json`   | the full search trace                            |
//!
//! Every artifact is canonical JSON. Each one is hashed under
//! [`HashDomain::RunArtifact`]; the manifest lists `(name, content_hash)` in
//! name order, and the report digest is the manifest's hash under
//! [`HashDomain::RunReport`].

use std::collections::BTreeMap;

use fifteen_kernel::proof::canon::canonical_json_bytes;
use fifteen_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use fifteen_search::replay::{verify_trace, ReplayError};
use fifteen_search::trace::Trace;
use fifteen_search::trace_reader::read_trace;

/// Schema tag written into the manifest.
pub const REPORT_SCHEMA: &str = "fifteen.run_report.v1";

pub const CONFIG_ARTIFACT: &str = "config.json";
pub const OUTCOME_ARTIFACT: &str = "outcome.json";
pub const TRACE_ARTIFACT: &str = "trace.json";

/// Every report carries exactly these artifacts (in name order).
pub const ARTIFACT_NAMES: [&str; 3] = [CONFIG_ARTIFACT, OUTCOME_ARTIFACT, TRACE_ARTIFACT];

/// One named artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub name: String,
    pub content: Vec<u8>,
    /// `canonical_hash(RunArtifact, content)`.
    pub content_hash: ContentHash,
}

/// The artifact set of a run.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    /// Artifacts indexed by name.
    pub artifacts: BTreeMap<String, ReportArtifact>,
    /// Canonical JSON manifest.
    pub manifest: Vec<u8>,
    /// `canonical_hash(RunReport, manifest)`.
    pub digest: ContentHash,
}

impl ReportBundle {
    #[must_use]
    pub fn artifact(&self, name: &str) -> Option<&ReportArtifact> {
        self.artifacts.get(name)
    }
}

/// Integrity failure in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Canonical JSON serialization failed.
    Canon { detail: String },
    /// A required artifact is absent.
    MissingArtifact { name: String },
    /// An artifact outside the fixed set is present.
    UnexpectedArtifact { name: String },
    /// Stored content hash does not match the content.
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    /// Stored manifest does not match one rebuilt from the artifacts.
    ManifestMismatch,
    /// Stored digest does not match the manifest.
    DigestMismatch { expected: String, actual: String },
    /// An artifact is not in canonical JSON form.
    ArtifactNotCanonical { artifact: String },
    /// `trace.json` could not be parsed.
    TraceParse { detail: String },
    /// `trace.json` parsed but does not replay.
    Replay(ReplayError),
    /// `outcome.json` is missing a field or contradicts the trace.
    Outcome { detail: String },
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canon { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::UnexpectedArtifact { name } => write!(f, "unexpected artifact: {name}"),
            Self::ContentHashMismatch {
                artifact,
                expected,
                actual,
            } => write!(
                f,
                "content hash mismatch for {artifact}: expected {expected}, got {actual}"
            ),
            Self::ManifestMismatch => write!(f, "manifest does not match artifacts"),
            Self::DigestMismatch { expected, actual } => {
                write!(f, "report digest mismatch: expected {expected}, got {actual}")
            }
            Self::ArtifactNotCanonical { artifact } => {
                write!(f, "artifact {artifact} is not canonical JSON")
            }
            Self::TraceParse { detail } => write!(f, "trace parse error: {detail}"),
            Self::Replay(e) => write!(f, "trace replay failed: {e}"),
            Self::Outcome { detail } => write!(f, "outcome error: {detail}"),
        }
    }
}

impl std::error::Error for ReportError {}

/// Assemble a bundle from `(name, content)` pairs.
///
/// # Errors
///
/// Returns [`ReportError::Canon`] if the manifest cannot be serialized.
pub fn build_bundle(artifacts: Vec<(String, Vec<u8>)>) -> Result<ReportBundle, ReportError> {
    let artifacts: BTreeMap<String, ReportArtifact> = artifacts
        .into_iter()
        .map(|(name, content)| {
            let content_hash = canonical_hash(HashDomain::RunArtifact, &content);
            (
                name.clone(),
                ReportArtifact {
                    name,
                    content,
                    content_hash,
                },
            )
        })
        .collect();
    let manifest = manifest_bytes(&artifacts)?;
    let digest = canonical_hash(HashDomain::RunReport, &manifest);
    Ok(ReportBundle {
        artifacts,
        manifest,
        digest,
    })
}

/// Check a bundle's integrity and re-verify its trace.
///
/// Returns the parsed, replay-verified trace on success.
///
/// # Errors
///
/// Returns the first [`ReportError`] found.
pub fn verify_bundle(bundle: &ReportBundle) -> Result<Trace, ReportError> {
    for name in ARTIFACT_NAMES {
        if !bundle.artifacts.contains_key(name) {
            return Err(ReportError::MissingArtifact {
                name: name.to_string(),
            });
        }
    }
    if let Some(name) = bundle
        .artifacts
        .keys()
        .find(|k| !ARTIFACT_NAMES.contains(&k.as_str()))
    {
        return Err(ReportError::UnexpectedArtifact { name: name.clone() });
    }

    for artifact in bundle.artifacts.values() {
        let actual = canonical_hash(HashDomain::RunArtifact, &artifact.content);
        if actual != artifact.content_hash {
            return Err(ReportError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: actual.as_str().to_string(),
            });
        }
        ensure_canonical(artifact)?;
    }

    if manifest_bytes(&bundle.artifacts)? != bundle.manifest {
        return Err(ReportError::ManifestMismatch);
    }
    let digest = canonical_hash(HashDomain::RunReport, &bundle.manifest);
    if digest != bundle.digest {
        return Err(ReportError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: digest.as_str().to_string(),
        });
    }

    let trace = read_trace(&bundle.artifacts[TRACE_ARTIFACT].content).map_err(|e| {
        ReportError::TraceParse {
            detail: e.to_string(),
        }
    })?;
    verify_trace(&trace).map_err(ReportError::Replay)?;
    verify_outcome_binding(&bundle.artifacts[OUTCOME_ARTIFACT].content, &trace)?;
    Ok(trace)
}

fn manifest_bytes(artifacts: &BTreeMap<String, ReportArtifact>) -> Result<Vec<u8>, ReportError> {
    let entries: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();
    let value = serde_json::json!({
        "artifacts": entries,
        "schema": REPORT_SCHEMA,
    });
    canonical_json_bytes(&value).map_err(|e| ReportError::Canon {
        detail: e.to_string(),
    })
}

fn ensure_canonical(artifact: &ReportArtifact) -> Result<(), ReportError> {
    let not_canonical = || ReportError::ArtifactNotCanonical {
        artifact: artifact.name.clone(),
    };
    let value: serde_json::Value =
        serde_json::from_slice(&artifact.content).map_err(|_| not_canonical())?;
    let recanon = canonical_json_bytes(&value).map_err(|_| not_canonical())?;
    if recanon != artifact.content {
        return Err(not_canonical());
    }
    Ok(())
}

/// `outcome.json` must name this trace and agree with its last step.
fn verify_outcome_binding(outcome: &[u8], trace: &Trace) -> Result<(), ReportError> {
    let err = |detail: String| ReportError::Outcome { detail };
    let value: serde_json::Value =
        serde_json::from_slice(outcome).map_err(|e| err(e.to_string()))?;

    let declared = value["trace_digest"]
        .as_str()
        .ok_or_else(|| err("missing trace_digest".to_string()))?;
    let recomputed = trace.digest().map_err(|e| ReportError::Canon {
        detail: e.to_string(),
    })?;
    if declared != recomputed.as_str() {
        return Err(err(format!(
            "trace_digest {declared} does not match trace ({recomputed})"
        )));
    }

    let solved = match value["status"].as_str() {
        Some("solved") => true,
        Some("not_found") => false,
        _ => return Err(err("status must be \"solved\" or \"not_found\"".to_string())),
    };
    let best = trace.last_step().and_then(|s| s.best_state_id);
    if solved != best.is_some() {
        return Err(err(format!(
            "status {} contradicts the trace",
            value["status"]
        )));
    }
    Ok(())
}
