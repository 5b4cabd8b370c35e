// CLI integration tests for the scopeshim developer tool.
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_scopeshim");
    Command::new(exe)
}

fn parse_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().next().expect("json line");
    serde_json::from_str(line).expect("valid json")
}

fn run_with_stdin(args: &[&str], input: &[u8]) -> std::process::Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input)
        .expect("write stdin");
    child.wait_with_output().expect("output")
}

#[test]
fn header_lists_exported_symbols() {
    let output = cmd().arg("header").output().expect("header");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    assert!(text.contains("#ifndef SCOPESHIM_H"));
    assert!(text.contains("uscp_search_reply_push("));
    assert!(text.contains("uscp_shared_release(SharedPtrData token)"));
}

#[test]
fn strings_encode_then_decode() {
    let encoded = cmd()
        .args(["strings", "encode", "w1", "", "w2"])
        .output()
        .expect("encode");
    assert!(encoded.status.success());
    assert_eq!(encoded.stdout, b"w1\0\0w2\0");

    let decoded = run_with_stdin(&["strings", "decode"], &encoded.stdout);
    assert!(decoded.status.success());
    let value = parse_json_line(&decoded.stdout);
    assert_eq!(value, serde_json::json!(["w1", "", "w2"]));
}

#[test]
fn variant_check_reads_a_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("doc.json");
    std::fs::write(&path, "{ \"z\": 1,\n  \"a\": [true, null] }").expect("write");

    let output = cmd()
        .args(["variant", "check", path.to_str().unwrap()])
        .output()
        .expect("check");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim_end(),
        r#"{"z":1,"a":[true,null]}"#
    );
}

#[test]
fn variant_check_reports_conversion_errors() {
    let output = run_with_stdin(&["variant", "check"], b"{\"a\":");
    assert_eq!(output.status.code(), Some(6));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Conversion");
    assert!(
        err["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("input: invalid json")
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("absent.json");
    let output = cmd()
        .args(["variant", "check", missing.to_str().unwrap()])
        .output()
        .expect("check");
    assert_eq!(output.status.code(), Some(8));
    assert_eq!(parse_json_line(&output.stderr)["error"]["kind"], "Io");
}

#[test]
fn query_uri_and_parse() {
    let output = cmd()
        .args([
            "query",
            "uri",
            "--scope",
            "scope-a",
            "--query",
            "coffee beans",
            "--department",
            "drinks",
        ])
        .output()
        .expect("uri");
    assert!(output.status.success());
    let uri = String::from_utf8(output.stdout).unwrap().trim_end().to_string();
    assert_eq!(uri, "scope://scope-a?q=coffee+beans&dep=drinks");

    let parsed = cmd().args(["query", "parse", &uri]).output().expect("parse");
    assert!(parsed.status.success());
    let value = parse_json_line(&parsed.stdout);
    assert_eq!(value["scope_id"], "scope-a");
    assert_eq!(value["query_string"], "coffee beans");
    assert_eq!(value["department_id"], "drinks");
}

#[test]
fn foreign_uri_is_rejected() {
    let output = cmd()
        .args(["query", "parse", "https://example.com"])
        .output()
        .expect("parse");
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(parse_json_line(&output.stderr)["error"]["kind"], "InvalidArgument");
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = cmd().arg("bogus").output().expect("bogus");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(parse_json_line(&output.stderr)["error"]["kind"], "Usage");
}
