//! Target descriptors
//!
//! A target is one buildable output: a program or a library anchored at a
//! root module. Its descriptor carries the artifact shape, an optional
//! platform restriction, feature flags and global definitions, and
//! platform-conditional overrides for the latter two.
//!
//! ```toml
//! name = "Viewer"
//! output_kind = "program"
//! link_mode = "monolithic"
//! supported_platform_class = "desktop"
//! build_settings_version = "v2"
//! root_module = "Viewer"
//! extra_modules = ["EditorStyle"]
//! global_definitions = ["USE_IO_DISPATCHER=1"]
//!
//! [feature_flags]
//! build_developer_tools = true
//! use_logging_in_shipping = true
//! compile_with_plugin_support = false
//!
//! [[conditionals]]
//! when = { platform = "Mac" }
//! feature_flags = { has_exports = true }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::condition::Predicate;
use crate::core::platform::{PlatformClass, PlatformContext};
use crate::error::ResolveError;

/// Kind of artifact a target produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    /// Executable
    Program,
    /// Dynamically linked library
    SharedLibrary,
    /// Statically linked library
    StaticLibrary,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program => write!(f, "program"),
            Self::SharedLibrary => write!(f, "shared-library"),
            Self::StaticLibrary => write!(f, "static-library"),
        }
    }
}

/// Whether dependent modules end up in one binary or stay separate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Everything linked into a single binary
    Monolithic,
    /// One binary per module
    Modular,
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monolithic => write!(f, "monolithic"),
            Self::Modular => write!(f, "modular"),
        }
    }
}

/// Link mode used when a descriptor does not name one
pub fn default_link_mode(kind: OutputKind) -> LinkMode {
    match kind {
        OutputKind::SharedLibrary => LinkMode::Modular,
        OutputKind::Program | OutputKind::StaticLibrary => LinkMode::Monolithic,
    }
}

/// Version tag selecting the defaulting rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSettingsVersion {
    /// Legacy defaults
    V1,
    /// Current defaults
    #[default]
    V2,
}

/// Precompiled header strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchUsage {
    /// Modules share a common precompiled header
    Shared,
    /// Modules use their own header when declared, the shared one otherwise
    ExplicitOrShared,
}

/// Settings implied by a [`BuildSettingsVersion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDefaults {
    /// Add each module's conventional `Public` directory to its public include paths
    pub legacy_public_include_paths: bool,

    /// Treat shadowed variables as errors
    pub shadow_variable_errors: bool,

    /// Precompiled header strategy
    pub pch_usage: PchUsage,
}

impl BuildDefaults {
    /// Defaults for a settings version
    pub fn for_version(version: BuildSettingsVersion) -> Self {
        match version {
            BuildSettingsVersion::V1 => Self {
                legacy_public_include_paths: true,
                shadow_variable_errors: false,
                pch_usage: PchUsage::Shared,
            },
            BuildSettingsVersion::V2 => Self {
                legacy_public_include_paths: false,
                shadow_variable_errors: true,
                pch_usage: PchUsage::ExplicitOrShared,
            },
        }
    }
}

/// One `(predicate, effect)` clause of a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConditional {
    /// Platform predicate guarding the clause
    pub when: Predicate,

    /// Flags assigned when the predicate matches
    #[serde(default)]
    pub feature_flags: BTreeMap<String, bool>,

    /// Definitions added when the predicate matches
    #[serde(default)]
    pub definitions: BTreeSet<String>,
}

/// Complete target descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    /// Target name
    pub name: String,

    /// Artifact kind
    pub output_kind: OutputKind,

    /// Link mode; defaults from the output kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_mode: Option<LinkMode>,

    /// Platform restriction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_platform_class: Option<PlatformClass>,

    /// Defaulting rules version
    #[serde(default)]
    pub build_settings_version: BuildSettingsVersion,

    /// Module anchoring the resolution
    pub root_module: String,

    /// Additional top-level modules, in order
    #[serde(default)]
    pub extra_modules: Vec<String>,

    /// Compile-time symbols defined for every module
    #[serde(default)]
    pub global_definitions: BTreeSet<String>,

    /// Named toggles passed through to the build engine
    #[serde(default)]
    pub feature_flags: BTreeMap<String, bool>,

    /// Platform-conditional overrides, in declared order
    #[serde(default)]
    pub conditionals: Vec<TargetConditional>,
}

impl TargetDescriptor {
    /// Create a program target rooted at a module
    pub fn program(name: impl Into<String>, root_module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output_kind: OutputKind::Program,
            link_mode: None,
            supported_platform_class: None,
            build_settings_version: BuildSettingsVersion::default(),
            root_module: root_module.into(),
            extra_modules: Vec::new(),
            global_definitions: BTreeSet::new(),
            feature_flags: BTreeMap::new(),
            conditionals: Vec::new(),
        }
    }

    /// Parse from TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Root module followed by the extra modules
    pub fn seed_modules(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.root_module).chain(self.extra_modules.iter())
    }
}

/// Target settings resolved for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSettings {
    /// Target name
    pub name: String,

    /// Platform the settings were resolved for
    pub platform: String,

    /// Artifact kind
    pub output_kind: OutputKind,

    /// Effective link mode
    pub link_mode: LinkMode,

    /// Defaulting rules version
    pub build_settings_version: BuildSettingsVersion,

    /// Module anchoring the resolution
    pub root_module: String,

    /// Additional top-level modules
    pub extra_modules: Vec<String>,

    /// Effective global definitions
    pub global_definitions: BTreeSet<String>,

    // Tables last so the TOML rendering stays valid
    /// Settings implied by the version
    pub defaults: BuildDefaults,

    /// Effective feature flags
    pub feature_flags: BTreeMap<String, bool>,
}

impl TargetSettings {
    /// Value of a feature flag (unset flags are off)
    pub fn flag(&self, name: &str) -> bool {
        self.feature_flags.get(name).copied().unwrap_or(false)
    }
}

/// Resolve a target's settings for a platform
///
/// Fails with [`ResolveError::UnsupportedPlatform`] when the target's
/// platform class excludes the context. Matching conditionals are applied in
/// declared order: definitions accumulate, and a later clause overrides an
/// earlier one for the same flag.
pub fn resolve_target(
    target: &TargetDescriptor,
    ctx: &PlatformContext,
) -> Result<TargetSettings, ResolveError> {
    if let Some(class) = target.supported_platform_class {
        if !class.contains(ctx) {
            return Err(ResolveError::UnsupportedPlatform {
                target: target.name.clone(),
                platform: ctx.platform.clone(),
                class: class.to_string(),
            });
        }
    }

    let mut feature_flags = target.feature_flags.clone();
    let mut global_definitions = target.global_definitions.clone();

    for clause in target.conditionals.iter().filter(|c| c.when.matches(ctx)) {
        tracing::debug!("Target {}: applying clause {} on {}", target.name, clause.when, ctx);
        feature_flags.extend(clause.feature_flags.iter().map(|(k, v)| (k.clone(), *v)));
        global_definitions.extend(clause.definitions.iter().cloned());
    }

    Ok(TargetSettings {
        name: target.name.clone(),
        platform: ctx.platform.clone(),
        output_kind: target.output_kind,
        link_mode: target
            .link_mode
            .unwrap_or_else(|| default_link_mode(target.output_kind)),
        build_settings_version: target.build_settings_version,
        root_module: target.root_module.clone(),
        extra_modules: target.extra_modules.clone(),
        global_definitions,
        defaults: BuildDefaults::for_version(target.build_settings_version),
        feature_flags,
    })
}
