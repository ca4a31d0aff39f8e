use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Get the path to the fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Run the textprep binary with the given arguments
fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_textprep"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).display().to_string()
}

#[test]
fn test_human_readable_output() {
    let output = run(&["--file", &fixture("sample.txt")]);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Text: Hello, world! The 3. chapter starts here."), "Unexpected output: {}", stdout);
    assert!(stdout.contains("1 revision(s)"), "Unexpected output: {}", stdout);
    assert!(stdout.contains("Final checksum:"), "Missing checksum in output");
    assert!(stdout.contains("Language: English"), "Missing language in output");
    // "world" with its raw-input line:column and span
    assert!(stdout.contains("1:12\tworld\t7..12 -> 11..16"), "Unexpected output: {}", stdout);
}

#[test]
fn test_json_output() {
    let output = run(&["--file", &fixture("sample.txt"), "--json"]);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(json["success"], true);
    assert_eq!(json["text"], "Hello, world! The 3. chapter starts here.");
    assert_eq!(json["language"], "en");
    assert_eq!(json["version"], 1);
    assert_eq!(json["stages"], serde_json::json!(["whitespace"]));
    assert!(json["session_id"].as_u64().unwrap() >= 1);
    assert!(json["final_checksum"].is_string());
    assert_ne!(json["final_checksum"], json["input_checksum"]);

    let tokens = json["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 11);
    assert_eq!(tokens[4]["text"], "The");
    assert_eq!(tokens[4]["original"], serde_json::json!({ "start": 19, "end": 22 }));
    assert_eq!(tokens[4]["position"], serde_json::json!({ "line": 2, "column": 2 }));

    // Segments tile the normalized text
    let covered: u64 = json["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["current"]["end"].as_u64().unwrap() - s["current"]["start"].as_u64().unwrap())
        .sum();
    assert_eq!(covered, 41);
}

#[test]
fn test_config_selects_language() {
    let output = run(&["--file", &fixture("sample.txt"), "--config", &fixture("hungarian.json"), "--json"]);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["language"], "hu");
    let tokens = json["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 10);
    assert_eq!(tokens[5]["text"], "3.");
}

#[test]
fn test_language_flag_overrides_config() {
    let output = run(&[
        "--file", &fixture("sample.txt"),
        "--config", &fixture("hungarian.json"),
        "--language", "it",
        "--json",
    ]);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["language"], "it");
}

#[test]
fn test_no_normalize_keeps_text() {
    let output = run(&["--file", &fixture("sample.txt"), "--no-normalize", "--json"]);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let raw = fs::read_to_string(fixtures_dir().join("sample.txt")).unwrap();
    assert_eq!(json["text"], raw.as_str());
    assert_eq!(json["version"], 0);
    assert_eq!(json["final_checksum"], json["input_checksum"]);
}

#[test]
fn test_missing_file() {
    let output = run(&["--file", "/nonexistent/input.txt"]);

    assert!(!output.status.success(), "Binary should have failed on a missing file");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File not found"), "Expected not-found error, got: {}", stdout);
}

#[test]
fn test_invalid_utf8_file() {
    let output = run(&["--file", &fixture("invalid_utf8.txt"), "--json"]);

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("Invalid UTF-8"));
}

#[test]
fn test_invalid_config() {
    let output = run(&["--file", &fixture("sample.txt"), "--config", &fixture("invalid_config.json")]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("invalid config"), "Expected config error, got: {}", stdout);
}

#[test]
fn test_unknown_language_rejected() {
    let output = run(&["--file", &fixture("sample.txt"), "--language", "xx"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported language"), "Unexpected stderr: {}", stderr);
}

#[test]
fn test_json_output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("report.json");

    let output = run(&[
        "--file", &fixture("sample.txt"),
        "--json",
        "--output", &output_file.display().to_string(),
    ]);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty(), "Nothing should be printed to stdout");

    let output_content = fs::read_to_string(&output_file).expect("Failed to read output file");
    let json: serde_json::Value =
        serde_json::from_str(&output_content).expect("Output file should contain valid JSON");
    assert_eq!(json["success"], true);
}
