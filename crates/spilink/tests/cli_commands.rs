#![cfg(feature = "cli")]

use std::process::{Command, Output};

fn spilink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spilink"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("spilink should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn encode_prints_reference_frame() {
    let output = spilink(&["encode", "0x01", "--hex", "AA BB", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["function_id"], 1);
    assert_eq!(json["payload_size"], 2);
    assert_eq!(json["frame_size"], 10);
    assert_eq!(json["frame_hex"], "48 5A 01 02 00 AA BB 81 0D 0A");
}

#[test]
fn encode_rejects_oversized_payload() {
    let output = spilink(&["encode", "1", "--data", "abcdef", "--max-payload", "4"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_reports_payload() {
    let output = spilink(&[
        "decode",
        "48 5A 01 02 00 AA BB 81 0D 0A",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["function_id"], 1);
    assert_eq!(json["payload_hex"], "AA BB");
}

#[test]
fn decode_rejects_corrupted_check_byte() {
    let output = spilink(&["decode", "48 5A 01 02 00 AA BB 80 0D 0A"]);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid frame"), "stderr: {stderr}");
}

#[test]
fn decode_rejects_malformed_hex() {
    let output = spilink(&["decode", "48 5A 0"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn checksum_matches_reference_vector() {
    let output = spilink(&["checksum", "--hex", "AA BB", "--format", "json"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["length"], 2);
    assert_eq!(json["check_byte"], "0x81");
}

#[test]
fn version_extended_lists_limits() {
    let output = spilink(&["version", "--extended"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: spilink"));
    assert!(stdout.contains("max_payload_size: 1024"));
}
