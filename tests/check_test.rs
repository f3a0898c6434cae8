//! Integration tests for `buildrules check`
//!
//! - Resolves every target on every platform
//! - Platforms outside a target's class are skipped, not failed
//! - Any other resolution error fails the command

mod common;

use common::{stderr, stdout, TestProject};

#[test]
fn test_check_all_platforms() {
    let project = TestProject::sample();
    let output = project.run(&["check"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("✓ Viewer on Linux (5 modules)"));
    assert!(out.contains("✓ Viewer on Win64 (4 modules)"));
    assert!(out.contains("⚠ Viewer on Android skipped"));
    // Desktop, Server and Mobile platforms among the built-ins
    assert!(out.contains("4 resolved, 3 skipped, 0 failed"));
}

#[test]
fn test_check_selected_platforms() {
    let project = TestProject::sample();
    let output = project.run(&["check", "-p", "Mac", "-p", "IOS"]);
    assert!(output.status.success());

    assert!(stdout(&output).contains("1 resolved, 1 skipped, 0 failed"));
}

#[test]
fn test_check_json() {
    let project = TestProject::sample();
    let output = project.run(&["--json", "check", "-p", "Linux", "-p", "Android"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = value["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["platform"], "Linux");
    assert_eq!(entries[0]["status"], "ok");
    assert_eq!(entries[0]["fingerprint"].as_str().unwrap().len(), 64);
    assert_eq!(entries[1]["status"], "skipped");
}

#[test]
fn test_check_fails_on_broken_target() {
    let project = TestProject::sample();
    project.create_file(
        "Source/Broken.target.toml",
        "name = \"Broken\"\noutput_kind = \"program\"\nroot_module = \"Missing\"\n",
    );

    let output = project.run(&["check", "-p", "Linux"]);
    assert!(!output.status.success());

    let err = stderr(&output);
    assert!(err.contains("✗ Broken on Linux"));
    assert!(err.contains("Module 'Missing' not found"));
    assert!(err.contains("Check failed: 1 combination(s) did not resolve"));
}

#[test]
fn test_check_unknown_platform() {
    let project = TestProject::sample();
    let output = project.run(&["check", "-p", "Amiga"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown platform 'Amiga'"));
}
