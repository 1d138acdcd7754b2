// Runs the shipped conformance manifests through the reference runner binary.
use std::path::PathBuf;
use std::process::Command;

fn cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_qtry-conformance"))
}

fn manifest(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("conformance")
        .join(name)
}

#[test]
fn shipped_manifests_pass() {
    let output = cmd()
        .arg(manifest("packed_date.json"))
        .arg(manifest("slot_summary.json"))
        .output()
        .expect("run conformance");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn failing_step_is_reported_with_its_id() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{
  "conformance_version": 0,
  "steps": [
    {"id": "ok", "op": "decode", "input": {"raw": 0}, "expect": {"fields": [24, 0, 0, 0, 0, 0]}},
    {"id": "wrong_raw", "op": "encode", "input": {"fields": [24, 1, 1, 0, 0, 0]}, "expect": {"raw": 1}}
  ]
}"#,
    )
    .expect("write manifest");

    let output = cmd().arg(&path).output().expect("run conformance");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("step 1 (wrong_raw)"), "stderr: {stderr}");
}

#[test]
fn expected_error_must_match_kind() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("kind.json");
    std::fs::write(
        &path,
        r#"{
  "conformance_version": 0,
  "steps": [
    {"id": "not_overflow", "op": "summarize",
     "input": {"capacity": 1, "owners": ["A", "B"]},
     "expect": {"error": {"kind": "Corrupt"}}}
  ]
}"#,
    )
    .expect("write manifest");

    let output = cmd().arg(&path).output().expect("run conformance");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("expected error kind Corrupt, got Overflow"), "stderr: {stderr}");
}

#[test]
fn unsupported_manifest_version_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("future.json");
    std::fs::write(&path, r#"{"conformance_version": 3, "steps": []}"#).expect("write");

    let output = cmd().arg(&path).output().expect("run conformance");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported conformance_version"));
}
