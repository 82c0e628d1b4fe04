use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::{json, Value};
use tempfile::TempDir;

fn write_document(dir: &Path) -> PathBuf {
    let path = dir.join("doc.json");
    let doc = json!({
        "pages": [{"id": "0:1", "name": "Page 1", "children": [
            {"id": "1:1", "name": "Card", "type": "FRAME", "children": [
                {"id": "1:2", "name": "Swatch", "type": "RECTANGLE",
                 "fills": [{"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0}}]},
                {"id": "1:3", "name": "Odd", "type": "RECTANGLE",
                 "fills": [{"type": "SOLID", "color": {"r": 0, "g": 1, "b": 0}}]}
            ]}
        ]}],
        "paintStyles": [{"id": "S:red", "name": "Red",
            "paints": [{"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0}}]}]
    });
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).expect("write document");
    path
}

fn dsa() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dsa"))
}

fn parse_stdout(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("json envelope on stdout")
}

#[test]
fn scan_emits_scan_envelope() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_document(dir.path());

    let out = dsa()
        .args(["scan", "--document", doc.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run dsa");
    assert_eq!(out.status.code(), Some(0));
    let body = parse_stdout(&out.stdout);
    assert_eq!(body["mode"], "scan");
    assert_eq!(body["version"], "1");
    assert_eq!(body["report"]["scanScope"], "page");
    assert_eq!(body["report"]["scannedCount"], 3);
    assert_eq!(body["report"]["layers"].as_array().unwrap().len(), 2);
    assert_eq!(body["report"]["criticalCount"], 1);
    assert_eq!(body["report"]["warningCount"], 1);
}

#[test]
fn fail_on_critical_sets_exit_code_one() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_document(dir.path());

    let status = dsa()
        .args(["scan", "--document", doc.to_str().unwrap(), "--fail-on-critical"])
        .stdout(Stdio::null())
        .status()
        .expect("run dsa");
    assert_eq!(status.code(), Some(1));

    // selecting only the matchable layer leaves nothing critical
    let status = dsa()
        .args([
            "scan",
            "--document",
            doc.to_str().unwrap(),
            "--select",
            "1:2",
            "--fail-on-critical",
        ])
        .stdout(Stdio::null())
        .status()
        .expect("run dsa");
    assert_eq!(status.code(), Some(0));
}

#[test]
fn unknown_selection_is_a_fatal_error() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_document(dir.path());

    let out = dsa()
        .args(["scan", "--document", doc.to_str().unwrap(), "--select", "9:9"])
        .output()
        .expect("run dsa");
    assert_eq!(out.status.code(), Some(2));
    let body = parse_stdout(&out.stdout);
    assert_eq!(body["mode"], "error");
    assert_eq!(body["error"]["category"], "host");
}

#[test]
fn missing_document_reports_error_envelope() {
    let out = dsa()
        .args(["scan", "--document", "/nonexistent/doc.json"])
        .output()
        .expect("run dsa");
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(parse_stdout(&out.stdout)["mode"], "error");
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_document(dir.path());
    let cfg = dir.path().join("dsa.toml");
    std::fs::write(&cfg, "log_level = \"loud\"\n").expect("write config");

    let out = dsa()
        .args([
            "scan",
            "--document",
            doc.to_str().unwrap(),
            "--config",
            cfg.to_str().unwrap(),
        ])
        .output()
        .expect("run dsa");
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(parse_stdout(&out.stdout)["error"]["category"], "config");
}

#[test]
fn config_can_disable_mixed_text_warning() {
    let dir = TempDir::new().expect("tempdir");
    let doc = dir.path().join("doc.yaml");
    std::fs::write(
        &doc,
        r#"
pages:
  - id: "0:1"
    name: Page
    children:
      - id: "1:1"
        name: Runs
        type: TEXT
        fontName: "$mixed"
        fontSize: "$mixed"
        segments:
          - {characters: a, fontName: {family: Inter, style: Regular}, fontSize: 12}
          - {characters: b, fontName: {family: Inter, style: Bold}, fontSize: 12}
"#,
    )
    .expect("write document");
    let cfg = dir.path().join("dsa.toml");
    std::fs::write(&cfg, "mixed_text_warning = false\n").expect("write config");

    let with_default = dsa()
        .args(["scan", "--document", doc.to_str().unwrap()])
        .output()
        .expect("run dsa");
    let body = parse_stdout(&with_default.stdout);
    assert_eq!(
        body["report"]["layers"][0]["reasons"][0]["label"],
        "mixed text style within one layer"
    );

    let with_config = dsa()
        .args([
            "scan",
            "--document",
            doc.to_str().unwrap(),
            "--config",
            cfg.to_str().unwrap(),
        ])
        .output()
        .expect("run dsa");
    let body = parse_stdout(&with_config.stdout);
    assert_eq!(body["report"]["layers"][0]["reasons"][0]["label"], "missing text style");
}

#[test]
fn apply_actions_file_writes_updated_document() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_document(dir.path());
    let actions = dir.path().join("actions.json");
    let saved = dir.path().join("saved.json");
    std::fs::write(
        &actions,
        json!([
            {"nodeId": "1:2", "kind": "fill", "styleId": "S:red"},
            {"nodeId": "9:9", "kind": "fill", "styleId": "S:red"},
            {"nodeId": "1:1", "kind": "text", "styleId": "S:red"}
        ])
        .to_string(),
    )
    .expect("write actions");

    let out = dsa()
        .args([
            "apply",
            "--document",
            doc.to_str().unwrap(),
            "--actions",
            actions.to_str().unwrap(),
            "--write",
            saved.to_str().unwrap(),
        ])
        .output()
        .expect("run dsa");
    assert_eq!(out.status.code(), Some(1));
    let body = parse_stdout(&out.stdout);
    assert_eq!(body["mode"], "apply");
    assert_eq!(body["outcome"]["successActions"], 1);
    assert_eq!(body["outcome"]["failedActions"], 2);
    assert_eq!(body["outcome"]["results"][1]["message"], "target layer not found");

    let rescan = dsa()
        .args(["scan", "--document", saved.to_str().unwrap()])
        .output()
        .expect("run dsa");
    let report = &parse_stdout(&rescan.stdout)["report"];
    assert_eq!(report["layers"].as_array().unwrap().len(), 1);
    assert_eq!(report["layers"][0]["id"], "1:3");
}

#[test]
fn apply_single_action_from_flags() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_document(dir.path());

    let out = dsa()
        .args([
            "apply",
            "--document",
            doc.to_str().unwrap(),
            "--node",
            "1:3",
            "--kind",
            "fill",
            "--style",
            "S:red",
        ])
        .output()
        .expect("run dsa");
    assert_eq!(out.status.code(), Some(0));
    let body = parse_stdout(&out.stdout);
    assert_eq!(body["outcome"]["successLayerCount"], 1);
    assert_eq!(body["outcome"]["results"][0]["message"], "style applied");
}

#[test]
fn serve_answers_json_lines() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_document(dir.path());

    let mut child = dsa()
        .args(["serve", "--document", doc.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn dsa");
    {
        let stdin = child.stdin.as_mut().expect("stdin");
        writeln!(stdin, r#"{{"type":"scan"}}"#).unwrap();
        writeln!(stdin, "not json").unwrap();
        writeln!(
            stdin,
            r#"{{"type":"apply-style","nodeId":"1:2","kind":"fill","styleId":"S:red"}}"#
        )
        .unwrap();
        writeln!(stdin, r#"{{"type":"cancel"}}"#).unwrap();
    }
    let out = child.wait_with_output().expect("wait dsa");
    assert_eq!(out.status.code(), Some(0));

    let events: Vec<Value> = String::from_utf8(out.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).expect("event line"))
        .collect();
    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(
        types,
        vec![
            "auto-scan-state",
            "scan-result",
            "notify",
            "error",
            "apply-style-result",
            "notify"
        ]
    );
    assert_eq!(events[1]["trigger"], "manual");
    assert_eq!(events[2]["message"], "scan complete (page): 2 layer(s)");
    assert_eq!(events[4]["outcome"]["ok"], true);
}
