//! Integration tests for `buildrules platforms` and configuration layering
//!
//! - Lists built-in platforms with their groups
//! - Global and project config layers add or replace platforms
//! - Global variables are used when the project does not define them

mod common;

use common::{stderr, stdout, TestProject};

#[test]
fn test_lists_builtin_platforms() {
    let project = TestProject::sample();
    let output = project.run(&["platforms"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Linux (default): Desktop, Linux, Unix"));
    assert!(out.contains("Win64: Desktop, Microsoft, Windows"));
    assert!(out.contains("IOS: Apple, IOS, Mobile"));
}

#[test]
fn test_platforms_json() {
    let project = TestProject::sample();
    let output = project.run(&["platforms", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let platforms = value.as_array().unwrap();
    assert_eq!(platforms.len(), 7);
    assert!(platforms.iter().any(|p| p["platform"] == "LinuxServer"));
}

#[test]
fn test_layers_add_and_replace_platforms() {
    let project = TestProject::sample();
    project.create_global_config(
        r#"
[platforms.Switch]
groups = ["Console"]
"#,
    );
    project.create_file(
        "buildrules.toml",
        r#"
[project]
name = "Viewer"

[variables]
THIRD_PARTY = "ThirdParty"

[platforms.Switch]
groups = ["Console", "Nintendo"]

[platforms.linux]
groups = ["Linux", "Unix", "Desktop", "Steam"]
"#,
    );

    let output = project.run(&["platforms"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Switch: Console, Nintendo"));
    // Replaced under the built-in spelling
    assert!(out.contains("Linux: Desktop, Linux, Steam, Unix"));
    assert!(!out.contains("linux:"));
}

#[test]
fn test_global_variables_and_default_platform() {
    let project = TestProject::sample();
    project.create_global_config(
        r#"
default_platform = "Mac"

[variables]
THIRD_PARTY = "/global/third_party"
"#,
    );
    project.create_file("buildrules.toml", "[project]\nname = \"Viewer\"\n");

    let output = project.run(&["resolve", "Viewer"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("\"platform\": \"Mac\""));
    assert!(out.contains("/global/third_party/zlib"));
}

#[test]
fn test_verbose_logging_goes_to_stderr() {
    let project = TestProject::sample();

    let quiet = project.run(&["resolve", "Viewer"]);
    assert!(!stderr(&quiet).contains("INFO"));

    let verbose = project.run(&["-vv", "resolve", "Viewer"]);
    assert!(verbose.status.success());
    assert!(stderr(&verbose).contains("DEBUG"));
    assert_eq!(quiet.stdout, verbose.stdout);
}
