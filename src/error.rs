//! Error types for buildrules
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Resolution errors
///
/// Every variant is terminal for a resolution call: no partial manifest is
/// produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The target's supported platform class excludes the active platform
    #[error("Target '{target}' does not support platform '{platform}' (restricted to {class})")]
    UnsupportedPlatform {
        target: String,
        platform: String,
        class: String,
    },

    /// A referenced module has no descriptor
    #[error("{}", module_not_found_message(name, referenced_by.as_deref()))]
    ModuleNotFound {
        name: String,
        referenced_by: Option<String>,
    },

    /// The dependency graph contains a cycle
    #[error("Cyclic dependency detected: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}

fn module_not_found_message(name: &str, referenced_by: Option<&str>) -> String {
    match referenced_by {
        Some(origin) => format!("Module '{name}' not found (referenced by '{origin}')"),
        None => format!("Module '{name}' not found"),
    }
}

/// Descriptor loading and validation errors
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// Descriptor file could not be parsed
    #[error("Failed to parse descriptor '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Identifier does not match the naming rules
    #[error("Invalid {kind} name '{name}': must start with a letter or underscore and contain only letters, digits and underscores")]
    InvalidName { kind: &'static str, name: String },

    /// Compile-time definition is malformed
    #[error("Invalid definition '{definition}' in '{origin}': expected NAME or NAME=VALUE")]
    InvalidDefinition { origin: String, definition: String },

    /// Two module descriptors share a name
    #[error("Module '{name}' is declared twice: '{first}' and '{second}'")]
    DuplicateModule {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Two target descriptors share a name
    #[error("Target '{name}' is declared twice: '{first}' and '{second}'")]
    DuplicateTarget {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A `${VAR}` reference has no value
    #[error("Undefined variable '${{{name}}}' in '{origin}'")]
    UndefinedVariable { name: String, origin: String },

    /// Requested target is not part of the project
    #[error("Target '{name}' not found. Available targets: {}", available.join(", "))]
    TargetNotFound {
        name: String,
        available: Vec<String>,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// Project config not found
    #[error("No buildrules.toml found in '{path}'. Is this a buildrules project?")]
    ProjectNotFound { path: PathBuf },

    /// Platform id unknown to the registry
    #[error("Unknown platform '{name}'. Known platforms: {}", known.join(", "))]
    UnknownPlatform { name: String, known: Vec<String> },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to walk a directory tree
    #[error("Failed to scan '{path}': {error}")]
    Walk { path: PathBuf, error: String },
}

/// Top-level buildrules error type
#[derive(Error, Debug)]
pub enum BuildRulesError {
    /// Resolution error
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Descriptor error
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}
