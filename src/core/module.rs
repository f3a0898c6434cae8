//! Module descriptors
//!
//! A module is one compilable unit. Its descriptor lists include paths,
//! public and private module dependencies, include-only modules, plugins
//! loaded at runtime, prebuilt third-party libraries, and platform-conditional
//! additions to any of those.
//!
//! ```toml
//! name = "App"
//! public_include_paths = ["${ENGINE_DIR}/Source/Runtime/Launch/Public"]
//! public_dependencies = ["Core"]
//! private_dependencies = ["Platform", "Slate"]
//! private_include_path_modules = ["SlateReflector"]
//! dynamically_loaded_modules = ["SlateReflector"]
//!
//! [[conditionals]]
//! when = { platform = "Mac" }
//! private_dependencies = ["XCodeSourceCodeAccess"]
//! third_party_static_dependencies = ["CEF3"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::core::condition::Predicate;
use crate::core::platform::PlatformContext;
use crate::error::ResolveError;

/// Dependency declarations of a module, or the additions of one conditional clause
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeps {
    /// Include paths exported to consumers (search order matters)
    #[serde(default)]
    pub public_include_paths: Vec<String>,

    /// Include paths used only by this module's own compilation
    #[serde(default)]
    pub private_include_paths: Vec<String>,

    /// Modules required by this module and by everything that consumes it
    #[serde(default)]
    pub public_dependencies: BTreeSet<String>,

    /// Modules required only by this module
    #[serde(default)]
    pub private_dependencies: BTreeSet<String>,

    /// Modules whose public include paths are visible here, without linkage
    #[serde(default)]
    pub private_include_path_modules: BTreeSet<String>,

    /// Modules loaded at runtime instead of linked
    #[serde(default)]
    pub dynamically_loaded_modules: BTreeSet<String>,

    /// Compile-time definitions exported to consumers
    #[serde(default)]
    pub public_definitions: BTreeSet<String>,

    /// Prebuilt third-party static libraries linked into this module
    ///
    /// These have no module descriptor of their own.
    #[serde(default)]
    pub third_party_static_dependencies: BTreeSet<String>,
}

impl ModuleDeps {
    /// Union of two declaration sets
    ///
    /// Path lists are concatenated (`self` first); every set is unioned.
    #[must_use]
    pub fn union(&self, other: &ModuleDeps) -> ModuleDeps {
        fn merged(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
            a.union(b).cloned().collect()
        }

        ModuleDeps {
            public_include_paths: [
                self.public_include_paths.as_slice(),
                other.public_include_paths.as_slice(),
            ]
            .concat(),
            private_include_paths: [
                self.private_include_paths.as_slice(),
                other.private_include_paths.as_slice(),
            ]
            .concat(),
            public_dependencies: merged(&self.public_dependencies, &other.public_dependencies),
            private_dependencies: merged(&self.private_dependencies, &other.private_dependencies),
            private_include_path_modules: merged(
                &self.private_include_path_modules,
                &other.private_include_path_modules,
            ),
            dynamically_loaded_modules: merged(
                &self.dynamically_loaded_modules,
                &other.dynamically_loaded_modules,
            ),
            public_definitions: merged(&self.public_definitions, &other.public_definitions),
            third_party_static_dependencies: merged(
                &self.third_party_static_dependencies,
                &other.third_party_static_dependencies,
            ),
        }
    }

    /// Modules this module links against, public first
    pub fn link_dependencies(&self) -> impl Iterator<Item = &String> {
        self.public_dependencies
            .iter()
            .chain(self.private_dependencies.iter())
    }
}

/// One `(predicate, effect)` clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConditional {
    /// Platform predicate guarding the clause
    pub when: Predicate,

    /// Additions applied when the predicate matches
    #[serde(flatten)]
    pub effect: ModuleDeps,
}

/// Complete module descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique module name
    pub name: String,

    /// Unconditional declarations
    #[serde(flatten)]
    pub deps: ModuleDeps,

    /// Platform-conditional additions, in declared order
    #[serde(default)]
    pub conditionals: Vec<ModuleConditional>,

    /// Directory the descriptor was loaded from
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl ModuleDescriptor {
    /// Create an empty descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deps: ModuleDeps::default(),
            conditionals: Vec::new(),
            base_dir: None,
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

    /// Declarations in effect for a platform
    ///
    /// Unconditional declarations unioned with every matching clause.
    /// Clauses only ever add, so their order does not affect the sets.
    pub fn deps_for(&self, ctx: &PlatformContext) -> ModuleDeps {
        self.conditionals
            .iter()
            .filter(|clause| {
                let matched = clause.when.matches(ctx);
                tracing::trace!(
                    "Module {}: clause {} {} on {}",
                    self.name,
                    clause.when,
                    if matched { "matches" } else { "skipped" },
                    ctx
                );
                matched
            })
            .fold(self.deps.clone(), |acc, clause| acc.union(&clause.effect))
    }
}

/// Module descriptors keyed by name
pub type ModuleSet = BTreeMap<String, ModuleDescriptor>;

/// Build a [`ModuleSet`] from descriptors; later duplicates replace earlier ones
pub fn module_set<I>(modules: I) -> ModuleSet
where
    I: IntoIterator<Item = ModuleDescriptor>,
{
    modules.into_iter().map(|m| (m.name.clone(), m)).collect()
}

/// A module's declarations resolved for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Module name
    pub name: String,

    /// Merged declarations
    pub deps: ModuleDeps,

    /// Directory the descriptor was loaded from
    pub base_dir: Option<PathBuf>,
}

/// Resolve one module's dependency sets for a platform
pub fn resolve_module(
    modules: &ModuleSet,
    name: &str,
    ctx: &PlatformContext,
) -> Result<ResolvedModule, ResolveError> {
    let descriptor = modules.get(name).ok_or_else(|| ResolveError::ModuleNotFound {
        name: name.to_string(),
        referenced_by: None,
    })?;

    Ok(ResolvedModule {
        name: descriptor.name.clone(),
        deps: descriptor.deps_for(ctx),
        base_dir: descriptor.base_dir.clone(),
    })
}
