//! CLI integration tests

use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

/// Run the binary with an empty HOME so no user config is picked up
fn cco(args: &[&str]) -> Output {
    let home = tempfile::tempdir().expect("Failed to create temp home");
    Command::new(env!("CARGO_BIN_EXE_cco"))
        .args(args)
        .env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("CCO_RATES_FILE")
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("Output should be valid JSON")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = cco(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Cloud Cost Optimizer"), "Should show app name");
    assert!(stdout.contains("estimate"), "Should show estimate command");
    assert!(stdout.contains("billing"), "Should show billing command");
    assert!(stdout.contains("rates"), "Should show rates command");
    assert!(stdout.contains("--format"), "Should show format option");
}

/// Test estimate subcommand help
#[test]
fn test_estimate_help() {
    let output = cco(&["estimate", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Estimate help should succeed");
    for flag in [
        "--provider",
        "--vcpu",
        "--ram",
        "--storage",
        "--users",
        "--frequency",
        "--environment",
        "--days",
        "--storage-policy",
    ] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

/// Test the reference AWS scenario end to end
#[test]
fn test_estimate_json() {
    let output = cco(&[
        "estimate", "--provider", "AWS", "--vcpu", "4", "--ram", "16", "--storage", "100",
        "--users", "500", "--frequency", "per-day", "--environment", "production", "--days",
        "30", "--format", "json",
    ]);

    assert!(output.status.success(), "Estimate should succeed");
    let report = stdout_json(&output);
    let total = report["breakdown"]["total_cost"].as_f64().unwrap();
    assert!((total - 111.4).abs() < 1e-9);
    assert_eq!(report["breakdown"]["total_requests"], 15000);
    assert_eq!(report["advisories"][0]["rule"], "efficient");
}

/// Test that the table output shows the breakdown and recommendations
#[test]
fn test_estimate_table() {
    let output = cco(&[
        "estimate", "--vcpu", "16", "--environment", "development", "--days", "30",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Estimate should succeed");
    assert!(stdout.contains("Cost Estimate"));
    assert!(stdout.contains("Total Cost"));
    assert!(stdout.contains("Environment discount"));
    assert!(stdout.contains("CPU cost is $115.20"));
}

/// Test range validation errors surface to the user
#[test]
fn test_estimate_invalid_days() {
    let output = cco(&["estimate", "--days", "40"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Out of range duration should fail");
    assert!(stderr.contains("duration_days"), "Should name the field");
}

/// Test unsupported frequency values are rejected by the parser
#[test]
fn test_estimate_invalid_frequency() {
    let output = cco(&["estimate", "--frequency", "per-week"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Unknown frequency should fail");
    assert!(stderr.contains("Invalid request frequency"));
}

/// Test unknown providers are reported
#[test]
fn test_estimate_unknown_provider() {
    let output = cco(&["estimate", "--provider", "OCI"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Unknown provider should fail");
    assert!(stderr.contains("Unknown provider: OCI"));
}

/// Test billing analysis with filters
#[test]
fn test_billing_filtered_json() {
    let file = fixture("mock_billing.json");
    let output = cco(&[
        "billing",
        file.to_str().unwrap(),
        "--project",
        "Atlas",
        "--provider",
        "AWS",
        "--format",
        "json",
    ]);

    assert!(output.status.success(), "Billing analysis should succeed");
    let report = stdout_json(&output);
    assert_eq!(report["summary"]["record_count"], 5);
    let spend = report["summary"]["total_spend"].as_f64().unwrap();
    assert!((spend - 545.60).abs() < 1e-9);

    let messages: Vec<_> = report["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["message"].as_str().unwrap().to_string())
        .collect();
    assert!(messages.contains(
        &"EC2 in Atlas is underutilized. Consider downscaling or stopping.".to_string()
    ));
    assert!(messages.contains(&"High cost alert: EC2 in Atlas is costing $245.75/day.".to_string()));
    assert_eq!(report["projects"], serde_json::json!(["All", "Atlas", "Beacon"]));
}

/// Test billing table output with the daily series
#[test]
fn test_billing_table_daily() {
    let file = fixture("mock_billing.json");
    let output = cco(&["billing", file.to_str().unwrap(), "--daily"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Billing analysis should succeed");
    assert!(stdout.contains("Total Spend"));
    assert!(stdout.contains("Daily Cost per Service"));
    assert!(stdout.contains("2024-05-03"));
    assert!(stdout.contains("Optimization Recommendations"));
}

/// Test billing analysis of a missing file
#[test]
fn test_billing_missing_file() {
    let output = cco(&["billing", "/nonexistent/billing.json"]);
    assert!(!output.status.success(), "Missing file should fail");
}

/// Test rates with a custom rate table
#[test]
fn test_rates_custom_table() {
    let file = fixture("rates.json");
    let output = cco(&["rates", "--rates", file.to_str().unwrap(), "--format", "json"]);

    assert!(output.status.success(), "Rates should succeed");
    let rates = stdout_json(&output);
    assert_eq!(rates["OnPrem"]["req_cost"], 0.0);
    assert_eq!(rates["AWS"]["cpu_hr"], 0.01);
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = cco(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test missing required argument error handling
#[test]
fn test_missing_argument() {
    let output = cco(&["billing"]);

    assert!(!output.status.success(), "Missing argument should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}
