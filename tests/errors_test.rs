//! Integration tests for error reporting
//!
//! Every failure exits non-zero with a message naming what went wrong, and
//! never prints a partial manifest.

mod common;

use common::{stderr, stdout, TestProject};

fn assert_fails_with(project: &TestProject, args: &[&str], expected: &str) {
    let output = project.run(args);
    assert!(!output.status.success(), "Command unexpectedly succeeded");
    assert!(stdout(&output).is_empty(), "Partial output: {}", stdout(&output));

    let err = stderr(&output);
    assert!(err.contains(expected), "Expected '{expected}' in: {err}");
}

#[test]
fn test_missing_project_config() {
    let project = TestProject::new();
    assert_fails_with(&project, &["resolve", "Viewer"], "No buildrules.toml found");
}

#[test]
fn test_unknown_target() {
    let project = TestProject::sample();
    assert_fails_with(
        &project,
        &["resolve", "Editor"],
        "Target 'Editor' not found. Available targets: Viewer",
    );
}

#[test]
fn test_unknown_platform() {
    let project = TestProject::sample();
    assert_fails_with(&project, &["resolve", "Viewer", "-p", "Amiga"], "Unknown platform 'Amiga'");
}

#[test]
fn test_unsupported_platform() {
    let project = TestProject::sample();
    assert_fails_with(
        &project,
        &["resolve", "Viewer", "-p", "Android"],
        "Target 'Viewer' does not support platform 'Android'",
    );
}

#[test]
fn test_missing_module_names_referrer() {
    let project = TestProject::sample();
    project.create_file(
        "Source/Style/Style.module.toml",
        "name = \"Style\"\nprivate_dependencies = [\"Fonts\"]\n",
    );
    assert_fails_with(
        &project,
        &["resolve", "Viewer"],
        "Module 'Fonts' not found (referenced by 'Style')",
    );
}

#[test]
fn test_cycle_reports_path() {
    let project = TestProject::sample();
    project.create_file(
        "Source/Core/Core.module.toml",
        "name = \"Core\"\npublic_dependencies = [\"App\"]\n",
    );
    assert_fails_with(
        &project,
        &["resolve", "Viewer"],
        "Cyclic dependency detected: App -> Core -> App",
    );
}

#[test]
fn test_undefined_variable() {
    let project = TestProject::sample();
    project.create_file(
        "Source/Style/Style.module.toml",
        "name = \"Style\"\npublic_include_paths = [\"${BUILDRULES_TEST_UNSET_DIR}/Style\"]\n",
    );
    assert_fails_with(
        &project,
        &["resolve", "Viewer"],
        "Undefined variable '${BUILDRULES_TEST_UNSET_DIR}' in 'Style'",
    );
}

#[test]
fn test_duplicate_module() {
    let project = TestProject::sample();
    project.create_file("Source/Extra/Core.module.toml", "name = \"Core\"\n");
    assert_fails_with(&project, &["resolve", "Viewer"], "Module 'Core' is declared twice");
}

#[test]
fn test_invalid_descriptor() {
    let project = TestProject::sample();
    project.create_file("Source/Style/Style.module.toml", "name = \"Style\"\nbogus = [\n");
    assert_fails_with(&project, &["resolve", "Viewer"], "Failed to parse descriptor");
}

#[test]
fn test_invalid_module_name() {
    let project = TestProject::sample();
    project.create_file("Source/Style/Style.module.toml", "name = \"Style-Kit\"\n");
    assert_fails_with(&project, &["resolve", "Viewer"], "Invalid module name 'Style-Kit'");
}
