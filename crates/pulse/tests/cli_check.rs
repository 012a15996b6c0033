use std::path::PathBuf;
use std::process::Command;

use serde_json::{json, Value};

use pulse_contracts::PULSE_TOOL_REPORT_SCHEMA_VERSION;

fn repo_root() -> PathBuf {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn run_pulse(args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_pulse");
    Command::new(exe).args(args).output().expect("run pulse")
}

fn parse_json_stdout(out: &std::process::Output) -> Value {
    serde_json::from_slice(&out.stdout).expect("parse stdout JSON")
}

fn write_bytes(path: &PathBuf, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, bytes).expect("write file");
}

fn write_doc(path: &PathBuf, doc: &Value) {
    write_bytes(path, serde_json::to_vec_pretty(doc).expect("encode doc").as_slice());
}

fn clean_doc() -> Value {
    json!({
        "sections": [{
            "id": "overview",
            "index": 0,
            "components": [{"type": "textBlock", "text": "All good."}]
        }]
    })
}

#[test]
fn check_passes_a_clean_report() {
    let path = repo_root().join("target/tmp_pulse_clean.report.json");
    write_doc(&path, &clean_doc());

    let out = run_pulse(&["check", "--input", path.to_str().unwrap(), "--report-json"]);
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    let v = parse_json_stdout(&out);
    assert_eq!(v["schema_version"], PULSE_TOOL_REPORT_SCHEMA_VERSION);
    assert_eq!(v["command"], "check");
    assert_eq!(v["ok"], true);
    assert_eq!(v["inputs_count"], 1);
    assert_eq!(v["exit_code"], 0);
    let files = v["files"].as_array().expect("files[]");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["ok"], true);
    assert_eq!(files[0]["diagnostics_count"], 0);
    assert!(files[0].get("diagnostics").is_none(), "empty list is elided");
}

#[test]
fn check_reports_errors_with_exit_one() {
    let path = repo_root().join("target/tmp_pulse_dup.report.json");
    write_doc(
        &path,
        &json!({
            "sections": [
                {"id": "a", "index": 0},
                {"id": "a", "index": 1}
            ]
        }),
    );

    let out = run_pulse(&["check", "--input", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("duplicate section id: \"a\""),
        "stdout:\n{stdout}"
    );
    assert!(stdout.contains("[structure.duplicate_id]"), "stdout:\n{stdout}");
    assert!(
        stdout.contains("checked 1 file(s): 1 error(s), 0 warning(s)"),
        "stdout:\n{stdout}"
    );
}

#[test]
fn warnings_never_affect_exit_status() {
    let path = repo_root().join("target/tmp_pulse_warn.report.json");
    write_doc(
        &path,
        &json!({
            "sections": [{"id": "overview", "index": "0"}]
        }),
    );

    let out = run_pulse(&["check", "--input", path.to_str().unwrap(), "--report-json"]);
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    let v = parse_json_stdout(&out);
    assert_eq!(v["ok"], true);
    let files = v["files"].as_array().expect("files[]");
    assert_eq!(files[0]["diagnostics_count"], 1);
    assert_eq!(files[0]["diagnostics"][0]["level"], "warning");
    assert_eq!(files[0]["diagnostics"][0]["code"], "structure.numeric_as_text");
}

#[test]
fn schema_violations_surface_as_diagnostics() {
    let path = repo_root().join("target/tmp_pulse_kinds.report.json");
    write_doc(
        &path,
        &json!({
            "sections": [{"id": 7, "index": 0}]
        }),
    );

    let out = run_pulse(&["check", "--input", path.to_str().unwrap(), "--report-json"]);
    assert_eq!(out.status.code(), Some(1));
    let v = parse_json_stdout(&out);
    let diags = v["files"][0]["diagnostics"].as_array().expect("diagnostics[]");
    assert!(
        diags
            .iter()
            .any(|d| d["code"] == "schema.invalid" && d["path"] == "/sections[0].id"),
        "got: {diags:?}"
    );
}

#[test]
fn invalid_json_is_a_file_diagnostic_not_an_abort() {
    let root = repo_root();
    let bad = root.join("target/tmp_pulse_broken.report.json");
    write_bytes(&bad, b"{not json");
    let good = root.join("target/tmp_pulse_ok.report.json");
    write_doc(&good, &clean_doc());

    let out = run_pulse(&[
        "check",
        "--input",
        bad.to_str().unwrap(),
        "--input",
        good.to_str().unwrap(),
        "--report-json",
    ]);
    assert_eq!(out.status.code(), Some(1));
    let v = parse_json_stdout(&out);
    assert_eq!(v["ok"], false);
    assert_eq!(v["inputs_count"], 2);
    let files = v["files"].as_array().expect("files[]");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["ok"], false);
    assert_eq!(files[0]["diagnostics"][0]["code"], "parse.invalid_json");
    assert_eq!(files[1]["ok"], true);
}

#[test]
fn directory_inputs_collect_report_files_recursively() {
    let dir = repo_root().join("target/tmp_pulse_reports");
    let _ = std::fs::remove_dir_all(&dir);

    write_doc(&dir.join("a.report.json"), &clean_doc());
    write_doc(
        &dir.join("b.report.json"),
        &json!({
            "sections": [{
                "id": "results",
                "index": 0,
                "components": [{"type": "barChart"}]
            }]
        }),
    );
    write_bytes(&dir.join("notes.txt"), b"not a report");
    write_doc(&dir.join("nested/c.report.json"), &clean_doc());

    let out = run_pulse(&["check", "--input", dir.to_str().unwrap(), "--report-json"]);
    assert_eq!(out.status.code(), Some(1));
    let v = parse_json_stdout(&out);
    assert_eq!(v["inputs_count"], 3);
    let files = v["files"].as_array().expect("files[]");
    let names: Vec<&str> = files
        .iter()
        .map(|f| f["file"].as_str().expect("file name"))
        .collect();
    assert!(names[0].ends_with("a.report.json"), "got: {names:?}");
    assert!(names[1].ends_with("b.report.json"), "got: {names:?}");
    assert!(names[2].ends_with("c.report.json"), "got: {names:?}");
    assert_eq!(files[0]["ok"], true);
    assert_eq!(files[1]["ok"], false);
    assert_eq!(files[2]["ok"], true);
}

#[test]
fn missing_input_is_an_operational_failure() {
    let path = repo_root().join("target/tmp_pulse_missing.report.json");
    let _ = std::fs::remove_file(&path);

    let out = run_pulse(&["check", "--input", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("--input does not exist"),
        "stderr:\n{stderr}"
    );
}

#[test]
fn directory_without_reports_is_an_operational_failure() {
    let dir = repo_root().join("target/tmp_pulse_empty_dir");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create dir");

    let out = run_pulse(&["check", "--input", dir.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("no *.report.json inputs found"),
        "stderr:\n{stderr}"
    );
}

#[test]
fn max_depth_flag_tightens_the_nesting_guard() {
    let mut component = json!({"type": "textBlock"});
    for _ in 0..4 {
        component = json!({"type": "container", "components": [component]});
    }
    let path = repo_root().join("target/tmp_pulse_deep.report.json");
    write_doc(
        &path,
        &json!({
            "sections": [{"id": "overview", "index": 0, "components": [component]}]
        }),
    );

    let out = run_pulse(&["check", "--input", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));

    let out = run_pulse(&[
        "check",
        "--input",
        path.to_str().unwrap(),
        "--max-depth",
        "2",
        "--report-json",
    ]);
    assert_eq!(out.status.code(), Some(1));
    let v = parse_json_stdout(&out);
    assert_eq!(
        v["files"][0]["diagnostics"][0]["code"],
        "component.depth_exceeded"
    );
}

#[test]
fn schema_command_prints_the_embedded_schemas() {
    let out = run_pulse(&["schema"]);
    assert_eq!(out.status.code(), Some(0));
    let v = parse_json_stdout(&out);
    assert_eq!(v["$id"], "pulse.report.schema.json");

    let out = run_pulse(&["schema", "--which", "diag"]);
    assert_eq!(out.status.code(), Some(0));
    let v = parse_json_stdout(&out);
    assert_eq!(v["$id"], "pulse.diag.schema.json");
}
