//! Report directory persistence: write/read/verify a [`ReportBundle`] on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   report_manifest.json   canonical JSON, artifact names and content hashes
//!   report_digest.txt      ASCII digest string ("sha256:...")
//!   config.json            artifact
//!   outcome.json           artifact
//!   trace.json             artifact
//! ```
//!
//! The directory path is never part of any hash surface.
//!
//! # Fail-closed semantics
//!
//! - Missing metadata or artifact files → error
//! - Extra undeclared files → error
//! - Any content, manifest, or digest mismatch → error
//! - A trace that does not replay → error

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use fifteen_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use fifteen_search::trace::Trace;

use crate::config::{ConfigError, RunConfig};
use crate::report::{
    verify_bundle, ReportArtifact, ReportBundle, ReportError, CONFIG_ARTIFACT, REPORT_SCHEMA,
};
use crate::runner::RunReport;

const MANIFEST_FILENAME: &str = "report_manifest.json";
const DIGEST_FILENAME: &str = "report_digest.txt";
const METADATA_FILENAMES: &[&str] = &[MANIFEST_FILENAME, DIGEST_FILENAME];

/// Error persisting or loading a report directory.
#[derive(Debug)]
pub enum ReportDirError {
    /// I/O error.
    Io { detail: String },
    /// A required metadata file is missing.
    MissingMetadata { filename: String },
    /// A declared artifact file is missing.
    MissingArtifact { name: String },
    /// An undeclared file exists in the directory.
    ExtraFile { name: String },
    /// `report_manifest.json` is malformed.
    Manifest { detail: String },
    /// `report_digest.txt` does not match the manifest.
    DigestMismatch { stored: String, recomputed: String },
    /// The reconstructed bundle failed verification.
    Verify(ReportError),
    /// `config.json` does not parse as a run configuration.
    Config(ConfigError),
}

impl std::fmt::Display for ReportDirError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingMetadata { filename } => write!(f, "missing metadata file: {filename}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::ExtraFile { name } => write!(f, "undeclared extra file: {name}"),
            Self::Manifest { detail } => write!(f, "manifest error: {detail}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
            Self::Verify(e) => write!(f, "verification failed: {e}"),
            Self::Config(e) => write!(f, "stored config: {e}"),
        }
    }
}

impl std::error::Error for ReportDirError {}

/// A report read back from disk and fully verified.
#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub config: RunConfig,
    pub bundle: ReportBundle,
    pub trace: Trace,
}

/// Write a report into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`ReportDirError::Io`] on any filesystem failure.
pub fn write_report(dir: &Path, report: &RunReport) -> Result<(), ReportDirError> {
    let bundle = &report.bundle;
    std::fs::create_dir_all(dir).map_err(|e| io("create_dir_all", &e))?;
    for artifact in bundle.artifacts.values() {
        write_atomic(&dir.join(&artifact.name), &artifact.content)?;
    }
    write_atomic(&dir.join(MANIFEST_FILENAME), &bundle.manifest)?;
    write_atomic(&dir.join(DIGEST_FILENAME), bundle.digest.as_str().as_bytes())?;
    tracing::debug!(dir = %dir.display(), digest = bundle.digest.as_str(), "report written");
    Ok(())
}

/// Read a report directory and verify everything in it.
///
/// # Errors
///
/// Returns [`ReportDirError`] on the first integrity failure.
pub fn read_and_verify(dir: &Path) -> Result<LoadedReport, ReportDirError> {
    let manifest = read_required(dir, MANIFEST_FILENAME)?;
    let stored_digest = read_required(dir, DIGEST_FILENAME)?;

    let value: serde_json::Value =
        serde_json::from_slice(&manifest).map_err(|e| ReportDirError::Manifest {
            detail: e.to_string(),
        })?;
    if value["schema"].as_str() != Some(REPORT_SCHEMA) {
        return Err(ReportDirError::Manifest {
            detail: format!("unexpected schema {}", value["schema"]),
        });
    }
    let entries = value["artifacts"]
        .as_array()
        .ok_or_else(|| ReportDirError::Manifest {
            detail: "\"artifacts\" is not an array".into(),
        })?;

    let mut artifacts = BTreeMap::new();
    for entry in entries {
        let name = entry["name"]
            .as_str()
            .ok_or_else(|| ReportDirError::Manifest {
                detail: "entry missing \"name\"".into(),
            })?
            .to_string();
        let content_hash = entry["content_hash"]
            .as_str()
            .and_then(ContentHash::parse)
            .ok_or_else(|| ReportDirError::Manifest {
                detail: format!("entry {name} has no valid \"content_hash\""),
            })?;
        if name.contains(['/', '\\']) || METADATA_FILENAMES.contains(&name.as_str()) {
            return Err(ReportDirError::Manifest {
                detail: format!("illegal artifact name {name}"),
            });
        }
        let content = std::fs::read(dir.join(&name))
            .map_err(|_| ReportDirError::MissingArtifact { name: name.clone() })?;
        artifacts.insert(
            name.clone(),
            ReportArtifact {
                name,
                content,
                content_hash,
            },
        );
    }

    for filename in list_files(dir)? {
        if !artifacts.contains_key(&filename) && !METADATA_FILENAMES.contains(&filename.as_str())
        {
            return Err(ReportDirError::ExtraFile { name: filename });
        }
    }

    let recomputed = canonical_hash(HashDomain::RunReport, &manifest);
    let stored = String::from_utf8_lossy(&stored_digest).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(ReportDirError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }

    let bundle = ReportBundle {
        artifacts,
        manifest,
        digest: recomputed,
    };
    let trace = verify_bundle(&bundle).map_err(ReportDirError::Verify)?;
    let config = RunConfig::from_json_bytes(&bundle.artifacts[CONFIG_ARTIFACT].content)
        .map_err(ReportDirError::Config)?;
    Ok(LoadedReport {
        config,
        bundle,
        trace,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn io(what: &str, e: &std::io::Error) -> ReportDirError {
    ReportDirError::Io {
        detail: format!("{what}: {e}"),
    }
}

/// Write via temp file + rename in the same directory.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportDirError> {
    let dir = path.parent().ok_or_else(|| ReportDirError::Io {
        detail: "no parent directory".into(),
    })?;
    let temp_path = dir.join(format!(
        ".tmp_{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    std::fs::write(&temp_path, content)
        .map_err(|e| io(&format!("write {}", temp_path.display()), &e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| io(&format!("rename {}", temp_path.display()), &e))?;
    Ok(())
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, ReportDirError> {
    std::fs::read(dir.join(filename)).map_err(|_| ReportDirError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// Regular files in `dir`, skipping leftover temp files.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, ReportDirError> {
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io("read_dir", &e))? {
        let entry = entry.map_err(|e| io("dir entry", &e))?;
        let file_type = entry.file_type().map_err(|e| io("file_type", &e))?;
        if file_type.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with(".tmp_") {
                    files.insert(name.to_string());
                }
            }
        }
    }
    Ok(files)
}
