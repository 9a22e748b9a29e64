//! Report directory lock tests: run → write → read → verify through the
//! full harness pipeline, plus fail-closed checks on tampered directories.

use fifteen_harness::config::RunConfig;
use fifteen_harness::report::{ReportError, OUTCOME_ARTIFACT, TRACE_ARTIFACT};
use fifteen_harness::report_dir::{read_and_verify, write_report, ReportDirError};
use fifteen_harness::runner::{run, RunReport};
use fifteen_search::policy::GoalPolicy;
use fifteen_search::trace_reader::read_trace;
use lock_tests::scenarios;

fn six_move_report(goal_policy: GoalPolicy) -> RunReport {
    let mut config = RunConfig::new(scenarios::six_moves());
    config.goal_policy = goal_policy;
    run(&config).unwrap()
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

/// ACCEPTANCE: RPT-001-ROUNDTRIP
#[test]
fn roundtrip_produces_equivalent_report() {
    for goal_policy in [GoalPolicy::FirstGoal, GoalPolicy::ExhaustFrontier] {
        let report = six_move_report(goal_policy);
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), &report).unwrap();
        let loaded = read_and_verify(dir.path()).unwrap();

        assert_eq!(loaded.bundle.digest, report.bundle.digest);
        assert_eq!(loaded.bundle.manifest, report.bundle.manifest);
        assert_eq!(loaded.config, report.config);
        for (name, artifact) in &report.bundle.artifacts {
            assert_eq!(loaded.bundle.artifacts[name].content, artifact.content, "{name}");
        }
        assert_eq!(
            loaded.trace.to_canonical_json_bytes().unwrap(),
            report.result.trace.to_canonical_json_bytes().unwrap()
        );
    }
}

/// ACCEPTANCE: RPT-001-ROUNDTRIP
#[test]
fn trace_artifact_is_the_canonical_trace() {
    let report = six_move_report(GoalPolicy::FirstGoal);
    let bytes = &report.bundle.artifact(TRACE_ARTIFACT).unwrap().content;
    assert_eq!(*bytes, report.result.trace.to_canonical_json_bytes().unwrap());
    let parsed = read_trace(bytes).unwrap();
    assert_eq!(parsed.steps, report.result.trace.steps);
}

/// A directory path is never part of the digest.
///
/// ACCEPTANCE: RPT-001-ROUNDTRIP
#[test]
fn digest_independent_of_directory() {
    let report = six_move_report(GoalPolicy::FirstGoal);
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write_report(a.path(), &report).unwrap();
    write_report(&b.path().join("nested").join("deeper"), &report).unwrap();
    let da = read_and_verify(a.path()).unwrap().bundle.digest;
    let db = read_and_verify(&b.path().join("nested").join("deeper"))
        .unwrap()
        .bundle
        .digest;
    assert_eq!(da, db);
}

// ---------------------------------------------------------------------------
// Fail closed
// ---------------------------------------------------------------------------

/// ACCEPTANCE: RPT-002-FAIL-CLOSED
#[test]
fn outcome_tamper_detected() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), &six_move_report(GoalPolicy::FirstGoal)).unwrap();
    let path = dir.path().join(OUTCOME_ARTIFACT);
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, text.replace("\"solved\"", "\"not_found\"")).unwrap();
    let err = read_and_verify(dir.path()).unwrap_err();
    assert!(
        matches!(
            err,
            ReportDirError::Verify(ReportError::ContentHashMismatch { .. })
        ),
        "unexpected error: {err}"
    );
}

/// ACCEPTANCE: RPT-002-FAIL-CLOSED
#[test]
fn stray_temp_files_are_ignored_but_other_files_are_not() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), &six_move_report(GoalPolicy::FirstGoal)).unwrap();
    std::fs::write(dir.path().join(".tmp_trace.json"), b"partial").unwrap();
    read_and_verify(dir.path()).unwrap();

    std::fs::write(dir.path().join("trace.json.bak"), b"{}").unwrap();
    let err = read_and_verify(dir.path()).unwrap_err();
    assert!(matches!(err, ReportDirError::ExtraFile { .. }));
}

/// ACCEPTANCE: RPT-002-FAIL-CLOSED
#[test]
fn manifest_tamper_detected_by_digest() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), &six_move_report(GoalPolicy::FirstGoal)).unwrap();
    let path = dir.path().join("report_manifest.json");
    let mut bytes = std::fs::read(&path).unwrap();
    bytes.push(b' ');
    std::fs::write(&path, bytes).unwrap();
    let err = read_and_verify(dir.path()).unwrap_err();
    assert!(matches!(err, ReportDirError::DigestMismatch { .. }));
}
