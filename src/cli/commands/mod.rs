//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod check;
pub mod platforms;
pub mod resolve;
pub mod tree;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::output::OutputConfig;
use crate::core::project::Project;
use crate::infra::dirs::BuildRulesDirs;

/// Manifest rendering for `resolve`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ManifestFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// TOML
    Toml,
    /// Human-readable summary
    Text,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a target into a manifest
    Resolve {
        /// Target name
        target: String,

        /// Platform to resolve for (defaults to the configured or host platform)
        #[arg(short, long)]
        platform: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ManifestFormat::Json)]
        format: ManifestFormat,

        /// Write the manifest to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve every target on every platform without writing output
    Check {
        /// Platforms to check (all known platforms if not specified)
        #[arg(short, long)]
        platform: Vec<String>,
    },

    /// Display a target's module dependency tree
    Tree {
        /// Target name
        target: String,

        /// Platform to resolve for
        #[arg(short, long)]
        platform: Option<String>,

        /// Output in DOT graph format
        #[arg(long)]
        graph: bool,
    },

    /// List known platforms and their groups
    Platforms,
}

/// State shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Project root directory
    pub project_dir: PathBuf,

    /// Output preferences
    pub output: OutputConfig,
}

impl CommandContext {
    /// Load the project at `project_dir`
    pub fn load_project(&self) -> Result<Project> {
        let dirs = BuildRulesDirs::new();
        Project::load(&self.project_dir, &dirs)
            .with_context(|| format!("Failed to load project at {}", self.project_dir.display()))
    }
}

impl Commands {
    /// Execute the command
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Resolve {
                target,
                platform,
                format,
                output,
            } => resolve::execute(ctx, &target, platform.as_deref(), format, output.as_deref()),
            Self::Check { platform } => check::execute(ctx, &platform),
            Self::Tree {
                target,
                platform,
                graph,
            } => tree::execute(ctx, &target, platform.as_deref(), graph),
            Self::Platforms => platforms::execute(ctx),
        }
    }
}
