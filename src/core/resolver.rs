//! Dependency resolution
//!
//! Turns a target descriptor, a module set and a platform context into a
//! [`ResolutionManifest`].
//!
//! Resolution runs in three passes:
//!
//! 1. Target settings are resolved; an unsupported platform stops here,
//!    before any module is looked at.
//! 2. A depth-first walk from the root and extra modules follows every
//!    public and private edge. It reports dangling names and cycles, and
//!    records modules in post-order so dependencies precede dependents.
//! 3. Membership applies the propagation rule: the seeds, their direct
//!    dependencies, and everything reachable from those through public
//!    edges. A private dependency of any other module stays private to it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::config::defaults::LEGACY_PUBLIC_DIR;
use crate::core::manifest::{IncludePathPolicy, ResolutionManifest};
use crate::core::module::{resolve_module, ModuleSet, ResolvedModule};
use crate::core::platform::PlatformContext;
use crate::core::target::{resolve_target, TargetDescriptor, TargetSettings};
use crate::error::ResolveError;

/// Knobs that do not change which modules are selected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Duplicate include path handling
    pub include_path_policy: IncludePathPolicy,
}

/// Intermediate result: settings plus the resolved module graph
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Resolved target settings
    pub settings: TargetSettings,

    /// Member modules in dependency order
    pub order: Vec<String>,

    /// Every module touched by the walk, resolved for the platform
    pub modules: BTreeMap<String, ResolvedModule>,
}

impl Resolution {
    /// Resolved declarations of a module
    pub fn module(&self, name: &str) -> Option<&ResolvedModule> {
        self.modules.get(name)
    }

    /// Whether a module is part of the build
    pub fn is_member(&self, name: &str) -> bool {
        self.order.iter().any(|m| m == name)
    }
}

/// Resolve a target with default options
pub fn resolve(
    target: &TargetDescriptor,
    modules: &ModuleSet,
    ctx: &PlatformContext,
) -> Result<ResolutionManifest, ResolveError> {
    resolve_with(target, modules, ctx, ResolveOptions::default())
}

/// Resolve a target into a manifest
pub fn resolve_with(
    target: &TargetDescriptor,
    modules: &ModuleSet,
    ctx: &PlatformContext,
    options: ResolveOptions,
) -> Result<ResolutionManifest, ResolveError> {
    let resolution = resolve_graph(target, modules, ctx)?;
    Ok(assemble_manifest(&resolution, options))
}

/// Resolve settings and the module graph without merging
pub fn resolve_graph(
    target: &TargetDescriptor,
    modules: &ModuleSet,
    ctx: &PlatformContext,
) -> Result<Resolution, ResolveError> {
    let settings = resolve_target(target, ctx)?;
    tracing::debug!("Resolving target {} for {}", settings.name, ctx);

    let seeds: Vec<String> = target.seed_modules().cloned().collect();

    let mut walk = Walk::new(modules, ctx);
    for seed in &seeds {
        walk.visit(seed, None)?;
    }

    let members = select_members(&seeds, &walk.resolved);
    let order: Vec<String> = walk
        .post_order
        .into_iter()
        .filter(|name| members.contains(name))
        .collect();

    let mut resolved = walk.resolved;

    // Include-only modules must exist but never join the build order
    for name in &order {
        let include_modules: Vec<String> = resolved
            .get(name)
            .map(|m| m.deps.private_include_path_modules.iter().cloned().collect())
            .unwrap_or_default();
        for include in include_modules {
            if resolved.contains_key(&include) {
                continue;
            }
            let module = resolve_module(modules, &include, ctx)
                .map_err(|e| with_origin(e, Some(name.as_str())))?;
            resolved.insert(include, module);
        }
    }

    tracing::info!(
        "Resolved {} for {}: {} module(s)",
        settings.name,
        ctx,
        order.len()
    );

    Ok(Resolution {
        settings,
        order,
        modules: resolved,
    })
}

/// Merge the member modules' declarations into a manifest
pub fn assemble_manifest(resolution: &Resolution, options: ResolveOptions) -> ResolutionManifest {
    let settings = &resolution.settings;
    let mut include_paths = Vec::new();
    let mut dynamically_loaded_modules = BTreeSet::new();
    let mut third_party_static_dependencies = BTreeSet::new();
    let mut definitions = settings.global_definitions.clone();

    for module in resolution.order.iter().filter_map(|n| resolution.module(n)) {
        if settings.defaults.legacy_public_include_paths {
            if let Some(dir) = &module.base_dir {
                include_paths.push(format!("{}/{LEGACY_PUBLIC_DIR}", dir.display()));
            }
        }
        include_paths.extend(module.deps.public_include_paths.iter().cloned());
        include_paths.extend(module.deps.private_include_paths.iter().cloned());

        for include in &module.deps.private_include_path_modules {
            if let Some(source) = resolution.module(include) {
                include_paths.extend(source.deps.public_include_paths.iter().cloned());
            }
        }

        dynamically_loaded_modules.extend(module.deps.dynamically_loaded_modules.iter().cloned());
        definitions.extend(module.deps.public_definitions.iter().cloned());
        third_party_static_dependencies
            .extend(module.deps.third_party_static_dependencies.iter().cloned());
    }

    ResolutionManifest {
        modules: resolution.order.clone(),
        include_paths: options.include_path_policy.apply(include_paths),
        dynamically_loaded_modules,
        definitions,
        third_party_static_dependencies,
        target: settings.clone(),
    }
}

/// Depth-first walk over every link edge
struct Walk<'a> {
    modules: &'a ModuleSet,
    ctx: &'a PlatformContext,
    resolved: BTreeMap<String, ResolvedModule>,
    visited: BTreeSet<String>,
    in_progress: BTreeSet<String>,
    path: Vec<String>,
    post_order: Vec<String>,
}

impl<'a> Walk<'a> {
    fn new(modules: &'a ModuleSet, ctx: &'a PlatformContext) -> Self {
        Self {
            modules,
            ctx,
            resolved: BTreeMap::new(),
            visited: BTreeSet::new(),
            in_progress: BTreeSet::new(),
            path: Vec::new(),
            post_order: Vec::new(),
        }
    }

    fn visit(&mut self, name: &str, referenced_by: Option<&str>) -> Result<(), ResolveError> {
        if self.in_progress.contains(name) {
            let start = self.path.iter().position(|n| n == name).unwrap_or(0);
            let mut cycle = self.path.split_off(start);
            cycle.push(name.to_string());
            return Err(ResolveError::CyclicDependency { cycle });
        }

        if self.visited.contains(name) {
            return Ok(());
        }

        let module = resolve_module(self.modules, name, self.ctx)
            .map_err(|e| with_origin(e, referenced_by))?;
        let deps: Vec<String> = module.deps.link_dependencies().cloned().collect();
        tracing::debug!("Visiting {name} ({} link dependencies)", deps.len());
        self.resolved.insert(name.to_string(), module);

        self.in_progress.insert(name.to_string());
        self.path.push(name.to_string());

        for dep in &deps {
            self.visit(dep, Some(name))?;
        }

        self.path.pop();
        self.in_progress.remove(name);
        self.visited.insert(name.to_string());
        self.post_order.push(name.to_string());

        Ok(())
    }
}

/// Seeds, their direct dependencies, and the public closure of both
fn select_members(seeds: &[String], resolved: &BTreeMap<String, ResolvedModule>) -> BTreeSet<String> {
    let mut members = BTreeSet::new();
    let mut queue = VecDeque::new();

    for seed in seeds {
        if members.insert(seed.clone()) {
            queue.push_back(seed.clone());
        }
        if let Some(module) = resolved.get(seed) {
            for dep in module.deps.link_dependencies() {
                if members.insert(dep.clone()) {
                    queue.push_back(dep.clone());
                }
            }
        }
    }

    while let Some(name) = queue.pop_front() {
        if let Some(module) = resolved.get(&name) {
            for dep in &module.deps.public_dependencies {
                if members.insert(dep.clone()) {
                    queue.push_back(dep.clone());
                }
            }
        }
    }

    members
}

/// Attach the referencing module to a not-found error
fn with_origin(err: ResolveError, referenced_by: Option<&str>) -> ResolveError {
    match err {
        ResolveError::ModuleNotFound { name, .. } => ResolveError::ModuleNotFound {
            name,
            referenced_by: referenced_by.map(str::to_string),
        },
        other => other,
    }
}
