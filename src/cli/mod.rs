//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use commands::{CommandContext, Commands};
use output::OutputConfig;

/// buildrules - declarative build-configuration resolver
///
/// Resolves a target's modules, include paths and definitions for a platform.
#[derive(Parser, Debug)]
#[command(name = "buildrules")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, env = "BUILDRULES_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Output preferences from the global flags
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.json, self.verbose)
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = self.output_config();
        if let Some(cmd) = self.command {
            let project_dir = match self.project_dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let ctx = CommandContext {
                project_dir,
                output,
            };
            cmd.run(&ctx)
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
