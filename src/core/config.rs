//! Configuration layers
//!
//! Settings come from three layers, lowest precedence first:
//!
//! 1. Built-in defaults (`config::defaults` and the built-in platform table)
//! 2. Global `config.toml` in the user config directory
//! 3. Project `buildrules.toml` at the project root
//!
//! Variables and platform entries from a higher layer replace those of the
//! same name in a lower one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::defaults::DEFAULT_SOURCE_DIR;
use crate::core::manifest::IncludePathPolicy;
use crate::core::platform::{PlatformEntry, PlatformRegistry};
use crate::error::ConfigError;
use crate::infra::dirs::BuildRulesDirs;

/// Global configuration shared by every project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Platform used when neither the command line nor the project names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_platform: Option<String>,

    /// Values for `${NAME}` references in include paths
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Additional or overriding platform entries
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformEntry>,
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if the config file exists but
    /// contains invalid TOML.
    pub fn load(dirs: &BuildRulesDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No global config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = read_config(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}

/// `[project]` section of `buildrules.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name
    pub name: String,

    /// Platform used when the command line names none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_platform: Option<String>,

    /// Directory scanned for descriptors, relative to the project root
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Handling of repeated include paths in the manifest
    #[serde(default)]
    pub include_path_policy: IncludePathPolicy,
}

fn default_source_dir() -> String {
    DEFAULT_SOURCE_DIR.to_string()
}

/// Project configuration (`buildrules.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project settings
    pub project: ProjectSection,

    /// Values for `${NAME}` references in include paths
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Additional or overriding platform entries
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformEntry>,
}

impl ProjectConfig {
    /// Parse from TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from a `buildrules.toml` path
    ///
    /// # Errors
    ///
    /// `ConfigError::ProjectNotFound` when the file is missing,
    /// `ConfigError::ParseError` when it is invalid.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ProjectNotFound {
                path: path.parent().unwrap_or(path).to_path_buf(),
            });
        }

        let content = read_config(path)?;
        Self::from_toml(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Configuration after all layers are merged
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    /// Project name
    pub project_name: String,

    /// Platform used when the command line names none
    pub default_platform: Option<String>,

    /// Descriptor directory, relative to the project root
    pub source_dir: String,

    /// Handling of repeated include paths
    pub include_path_policy: IncludePathPolicy,

    /// Substitution variables
    pub variables: BTreeMap<String, String>,

    /// Known platforms
    pub platforms: PlatformRegistry,
}

impl EffectiveConfig {
    /// Merge the global and project layers over the built-in defaults
    pub fn merge(global: GlobalConfig, project: ProjectConfig) -> Self {
        let mut platforms = PlatformRegistry::builtin();
        platforms.extend(&global.platforms);
        platforms.extend(&project.platforms);

        let mut variables = global.variables;
        variables.extend(project.variables);

        Self {
            project_name: project.project.name,
            default_platform: project.project.default_platform.or(global.default_platform),
            source_dir: project.project.source_dir,
            include_path_policy: project.project.include_path_policy,
            variables,
            platforms,
        }
    }
}
