//! Resolution manifest
//!
//! The manifest is the only output of a resolution: the resolved target
//! settings, the modules in dependency order, and the merged include paths,
//! runtime-loaded modules, definitions and third-party libraries. The
//! external build engine must compile and link modules in the order given.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::core::target::TargetSettings;

/// Handling of include paths that appear more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncludePathPolicy {
    /// Keep every occurrence
    #[default]
    KeepAll,
    /// Keep only the first occurrence of each path
    KeepFirst,
    /// Keep only the last occurrence of each path
    KeepLast,
}

impl IncludePathPolicy {
    /// Apply the policy to an ordered path list
    #[must_use]
    pub fn apply(self, paths: Vec<String>) -> Vec<String> {
        match self {
            Self::KeepAll => paths,
            Self::KeepFirst => {
                let mut seen = BTreeSet::new();
                paths
                    .into_iter()
                    .filter(|p| seen.insert(p.clone()))
                    .collect()
            }
            Self::KeepLast => {
                let mut seen = BTreeSet::new();
                let mut kept: Vec<String> = paths
                    .into_iter()
                    .rev()
                    .filter(|p| seen.insert(p.clone()))
                    .collect();
                kept.reverse();
                kept
            }
        }
    }
}

/// Final, immutable result of resolving a target for a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionManifest {
    /// Modules in dependency order (dependencies before dependents)
    pub modules: Vec<String>,

    /// Include search paths, in precedence order
    pub include_paths: Vec<String>,

    /// Modules loaded at runtime rather than linked
    pub dynamically_loaded_modules: BTreeSet<String>,

    /// Compile-time definitions
    pub definitions: BTreeSet<String>,

    /// Prebuilt third-party static libraries to link
    #[serde(default)]
    pub third_party_static_dependencies: BTreeSet<String>,

    /// Resolved target settings
    pub target: TargetSettings,
}

impl ResolutionManifest {
    /// Position of a module in the build order
    pub fn position(&self, module: &str) -> Option<usize> {
        self.modules.iter().position(|m| m == module)
    }

    /// Whether a module is part of the build
    pub fn contains(&self, module: &str) -> bool {
        self.position(module).is_some()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parse from JSON
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// SHA-256 of the canonical (compact JSON) form, hex encoded
    ///
    /// Every collection in the manifest is ordered, so equal manifests
    /// always hash the same.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let canonical = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }
}
