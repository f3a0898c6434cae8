//! Project loading
//!
//! A project is a directory holding `buildrules.toml` and a source tree of
//! module and target descriptors. Loading merges the configuration layers,
//! discovers and parses every descriptor, and rejects duplicate names.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::defaults::PROJECT_CONFIG_FILE;
use crate::core::config::{EffectiveConfig, GlobalConfig, ProjectConfig};
use crate::core::descriptor::{parse_module, parse_target};
use crate::core::manifest::ResolutionManifest;
use crate::core::module::{ModuleDescriptor, ModuleSet};
use crate::core::platform::PlatformContext;
use crate::core::resolver::{resolve_graph, resolve_with, Resolution, ResolveOptions};
use crate::core::target::TargetDescriptor;
use crate::error::{BuildRulesError, ConfigError, DescriptorError};
use crate::infra::dirs::BuildRulesDirs;
use crate::infra::{discovery, filesystem};

/// A loaded project
#[derive(Debug, Clone)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Merged configuration
    pub config: EffectiveConfig,

    /// Targets keyed by name
    pub targets: BTreeMap<String, TargetDescriptor>,

    /// Module descriptors keyed by name
    pub modules: ModuleSet,
}

impl Project {
    /// Load the project rooted at `root`
    pub fn load(root: &Path, dirs: &BuildRulesDirs) -> Result<Self, BuildRulesError> {
        let global = GlobalConfig::load(dirs)?;
        let project = ProjectConfig::load_from_path(&root.join(PROJECT_CONFIG_FILE))?;
        let config = EffectiveConfig::merge(global, project);

        let source_dir = root.join(&config.source_dir);
        let files = discovery::find_descriptors(&source_dir)?;

        let mut modules = Vec::with_capacity(files.modules.len());
        for path in &files.modules {
            let content = filesystem::read_file(path)?;
            modules.push((path.clone(), parse_module(&content, path, &config.variables)?));
        }

        let mut targets = Vec::with_capacity(files.targets.len());
        for path in &files.targets {
            let content = filesystem::read_file(path)?;
            targets.push((path.clone(), parse_target(&content, path)?));
        }

        let project = Self::from_descriptors(root, config, targets, modules)?;
        tracing::info!(
            "Loaded project {}: {} target(s), {} module(s)",
            project.config.project_name,
            project.targets.len(),
            project.modules.len()
        );
        Ok(project)
    }

    /// Assemble a project from already parsed descriptors
    ///
    /// Each descriptor comes with the path it was read from, used to report
    /// duplicates.
    pub fn from_descriptors(
        root: &Path,
        config: EffectiveConfig,
        targets: Vec<(PathBuf, TargetDescriptor)>,
        modules: Vec<(PathBuf, ModuleDescriptor)>,
    ) -> Result<Self, DescriptorError> {
        let mut module_paths: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut module_set = ModuleSet::new();
        for (path, module) in modules {
            if let Some(first) = module_paths.get(&module.name) {
                return Err(DescriptorError::DuplicateModule {
                    name: module.name,
                    first: first.clone(),
                    second: path,
                });
            }
            module_paths.insert(module.name.clone(), path);
            module_set.insert(module.name.clone(), module);
        }

        let mut target_paths: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut target_set = BTreeMap::new();
        for (path, target) in targets {
            if let Some(first) = target_paths.get(&target.name) {
                return Err(DescriptorError::DuplicateTarget {
                    name: target.name,
                    first: first.clone(),
                    second: path,
                });
            }
            target_paths.insert(target.name.clone(), path);
            target_set.insert(target.name.clone(), target);
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            targets: target_set,
            modules: module_set,
        })
    }

    /// Look up a target by name
    pub fn target(&self, name: &str) -> Result<&TargetDescriptor, DescriptorError> {
        self.targets
            .get(name)
            .ok_or_else(|| DescriptorError::TargetNotFound {
                name: name.to_string(),
                available: self.targets.keys().cloned().collect(),
            })
    }

    /// Platform context to resolve for
    ///
    /// The explicit name wins, then the configured default platform, then
    /// the host platform.
    pub fn platform(&self, name: Option<&str>) -> Result<PlatformContext, ConfigError> {
        let registry = &self.config.platforms;
        if let Some(name) = name.or(self.config.default_platform.as_deref()) {
            return registry.context(name);
        }

        registry.host().ok_or_else(|| ConfigError::UnknownPlatform {
            name: std::env::consts::OS.to_string(),
            known: registry.contexts().into_iter().map(|c| c.platform).collect(),
        })
    }

    /// Resolve options derived from the configuration
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            include_path_policy: self.config.include_path_policy,
        }
    }

    /// Resolve a target into a manifest
    pub fn resolve(
        &self,
        target: &str,
        ctx: &PlatformContext,
    ) -> Result<ResolutionManifest, BuildRulesError> {
        let descriptor = self.target(target)?;
        Ok(resolve_with(descriptor, &self.modules, ctx, self.options())?)
    }

    /// Resolve a target's module graph without merging
    pub fn resolve_graph(
        &self,
        target: &str,
        ctx: &PlatformContext,
    ) -> Result<Resolution, BuildRulesError> {
        let descriptor = self.target(target)?;
        Ok(resolve_graph(descriptor, &self.modules, ctx)?)
    }
}
