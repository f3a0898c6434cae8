//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory for the project and a separate one used as
/// the global config directory, so the user's own configuration never leaks
/// into a test.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary global config directory
    pub config_dir: TempDir,
}

impl TestProject {
    /// Create a new empty test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            config_dir: TempDir::new().expect("Failed to create temp config directory"),
        }
    }

    /// Create a project populated with the sample descriptors
    pub fn sample() -> Self {
        let project = Self::new();
        project.create_file("buildrules.toml", SAMPLE_PROJECT);
        project.create_file("Source/Viewer.target.toml", SAMPLE_TARGET);
        for (name, content) in SAMPLE_MODULES {
            project.create_file(&format!("Source/{name}/{name}.module.toml"), content);
        }
        project
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Write the global `config.toml`
    pub fn create_global_config(&self, content: &str) {
        std::fs::write(self.config_dir.path().join("config.toml"), content)
            .expect("Failed to write global config");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Command for the buildrules binary, run inside the project
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_buildrules"));
        cmd.current_dir(self.path())
            .env("BUILDRULES_CONFIG_DIR", self.config_dir.path())
            .env_remove("BUILDRULES_PROJECT_DIR")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run buildrules with arguments
    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute buildrules")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of a command as a string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr of a command as a string
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Sample project config
pub const SAMPLE_PROJECT: &str = r#"
[project]
name = "Viewer"
default_platform = "Linux"

[variables]
THIRD_PARTY = "ThirdParty"
"#;

/// Sample desktop-only program target
pub const SAMPLE_TARGET: &str = r#"
name = "Viewer"
output_kind = "program"
supported_platform_class = "desktop"
root_module = "App"
extra_modules = ["Style"]
global_definitions = ["USE_IO_DISPATCHER=1"]

[feature_flags]
build_developer_tools = true

[[conditionals]]
when = { platform = "Mac" }
feature_flags = { build_developer_tools = false }
definitions = ["WITH_METAL=1"]
"#;

/// Sample module descriptors, keyed by module name
pub const SAMPLE_MODULES: &[(&str, &str)] = &[
    (
        "App",
        r#"
name = "App"
public_include_paths = ["App/Public"]
private_include_paths = ["App/Private"]
public_dependencies = ["Core"]
private_dependencies = ["Platform"]
private_include_path_modules = ["Reflector"]
dynamically_loaded_modules = ["Reflector"]

[[conditionals]]
when = { platform = "Mac" }
third_party_static_dependencies = ["CEF3"]
"#,
    ),
    (
        "Core",
        r#"
name = "Core"
public_include_paths = ["${THIRD_PARTY}/zlib", "Core/Public"]
public_definitions = ["CORE_API"]
"#,
    ),
    (
        "Platform",
        r#"
name = "Platform"

[[conditionals]]
when = { group = "Unix" }
public_dependencies = ["UnixSupport"]
"#,
    ),
    ("UnixSupport", "name = \"UnixSupport\"\n"),
    ("Style", "name = \"Style\"\n"),
    (
        "Reflector",
        r#"
name = "Reflector"
public_include_paths = ["Reflector/Public"]
"#,
    ),
];
