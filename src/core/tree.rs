//! Dependency tree visualization
//!
//! Displays a resolved target's module graph as a tree or exports it in DOT
//! graph format.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::core::resolver::Resolution;

/// Kind of edge between two modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DependencyType {
    /// Public dependency (propagates to consumers)
    Public,
    /// Private dependency
    Private,
    /// Include paths only, no linkage
    IncludeOnly,
    /// Loaded at runtime
    Dynamic,
}

impl DependencyType {
    /// Marker shown in tree output
    pub fn marker(self) -> &'static str {
        match self {
            Self::Public => "[public]",
            Self::Private => "[private]",
            Self::IncludeOnly => "[include]",
            Self::Dynamic => "[dynamic]",
        }
    }

    fn dot_style(self) -> &'static str {
        match self {
            Self::Public => "solid",
            Self::Private => "bold",
            Self::IncludeOnly => "dotted",
            Self::Dynamic => "dashed",
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
            Self::IncludeOnly => write!(f, "include"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A dependency edge in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Module depended upon
    pub target: String,
    /// Type of dependency
    pub dep_type: DependencyType,
}

/// Dependency tree structure
#[derive(Debug, Default)]
pub struct DependencyTree {
    /// Module dependencies: module -> outgoing edges
    dependencies: BTreeMap<String, Vec<DependencyEdge>>,
    /// Every module mentioned by the tree
    modules: BTreeSet<String>,
    /// Top-level modules (root module, then extra modules)
    roots: Vec<String>,
}

impl DependencyTree {
    /// Create a new empty dependency tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree of a resolved target
    ///
    /// Only member modules are expanded; their edges may point at modules
    /// that are not built (include-only, runtime-loaded, or private
    /// dependencies of non-root modules).
    pub fn from_resolution(resolution: &Resolution) -> Self {
        let mut tree = Self::new();

        for seed in std::iter::once(&resolution.settings.root_module)
            .chain(resolution.settings.extra_modules.iter())
        {
            if !tree.roots.contains(seed) {
                tree.roots.push(seed.clone());
            }
        }

        for name in &resolution.order {
            tree.modules.insert(name.clone());
            tree.dependencies.entry(name.clone()).or_default();

            let Some(module) = resolution.module(name) else {
                continue;
            };
            let deps = &module.deps;
            let edges = [
                (DependencyType::Public, &deps.public_dependencies),
                (DependencyType::Private, &deps.private_dependencies),
                (DependencyType::IncludeOnly, &deps.private_include_path_modules),
                (DependencyType::Dynamic, &deps.dynamically_loaded_modules),
            ];
            for (dep_type, targets) in edges {
                for target in targets {
                    tree.add_dependency(name, target, dep_type);
                }
            }
        }

        tree
    }

    /// Add a dependency edge
    pub fn add_dependency(&mut self, from: &str, to: &str, dep_type: DependencyType) {
        self.modules.insert(from.to_string());
        self.modules.insert(to.to_string());

        self.dependencies
            .entry(from.to_string())
            .or_default()
            .push(DependencyEdge {
                target: to.to_string(),
                dep_type,
            });
    }

    /// Get the top-level modules
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Get outgoing edges of a module
    pub fn dependencies(&self, module: &str) -> Option<&Vec<DependencyEdge>> {
        self.dependencies.get(module)
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Get all modules
    pub fn modules(&self) -> &BTreeSet<String> {
        &self.modules
    }

    /// Format as tree string
    pub fn format_tree(&self) -> String {
        if self.is_empty() {
            return "No modules in target".to_string();
        }

        let mut output = String::new();
        output.push_str("Dependency Tree:\n");

        let mut expanded = BTreeSet::new();
        for (i, root) in self.roots.iter().enumerate() {
            let is_last = i == self.roots.len() - 1;
            let mut path = BTreeSet::new();
            self.format_node(&mut output, root, root, "", is_last, &mut path, &mut expanded);
        }

        output
    }

    /// Render one node; a module whose children were already shown is
    /// marked `(*)` and not expanded again
    #[allow(clippy::too_many_arguments)]
    fn format_node(
        &self,
        output: &mut String,
        node: &str,
        label: &str,
        prefix: &str,
        is_last: bool,
        path: &mut BTreeSet<String>,
        expanded: &mut BTreeSet<String>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let has_children = self.dependencies.get(node).is_some_and(|d| !d.is_empty());

        // Guard against revisiting a module on the current path
        if path.contains(node) {
            let _ = writeln!(output, "{prefix}{connector}{label}");
            return;
        }
        if has_children && !expanded.insert(node.to_string()) {
            let _ = writeln!(output, "{prefix}{connector}{label} (*)");
            return;
        }
        let _ = writeln!(output, "{prefix}{connector}{label}");
        path.insert(node.to_string());

        if let Some(deps) = self.dependencies.get(node) {
            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };

            for (i, dep) in deps.iter().enumerate() {
                let is_last_dep = i == deps.len() - 1;
                let dep_label = format!("{} {}", dep.target, dep.dep_type.marker());
                // Include-only and runtime edges are leaves
                if matches!(dep.dep_type, DependencyType::IncludeOnly | DependencyType::Dynamic) {
                    let connector = if is_last_dep { "└── " } else { "├── " };
                    let _ = writeln!(output, "{child_prefix}{connector}{dep_label}");
                } else {
                    self.format_node(
                        output,
                        &dep.target,
                        &dep_label,
                        &child_prefix,
                        is_last_dep,
                        path,
                        expanded,
                    );
                }
            }
        }

        path.remove(node);
    }

    /// Format as DOT graph
    pub fn format_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph dependencies {\n");
        output.push_str("    rankdir=TB;\n");
        output.push_str("    node [shape=box];\n");
        output.push('\n');

        for module in &self.modules {
            let _ = writeln!(output, "    \"{module}\";");
        }
        output.push('\n');

        for (from, deps) in &self.dependencies {
            for dep in deps {
                let _ = writeln!(
                    output,
                    "    \"{}\" -> \"{}\" [style={}, label=\"{}\"];",
                    from,
                    dep.target,
                    dep.dep_type.dot_style(),
                    dep.dep_type
                );
            }
        }

        output.push_str("}\n");
        output
    }
}
