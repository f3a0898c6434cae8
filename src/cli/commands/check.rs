//! Check command implementation
//!
//! Implements `buildrules check` to resolve every target on every platform
//! without writing any manifest.

use anyhow::{bail, Result};

use super::CommandContext;
use crate::cli::output::status;
use crate::core::check::{self, CheckOutcome};
use crate::core::platform::PlatformContext;

/// Execute the check command
pub fn execute(ctx: &CommandContext, platforms: &[String]) -> Result<()> {
    let project = ctx.load_project()?;

    let contexts: Vec<PlatformContext> = if platforms.is_empty() {
        project.config.platforms.contexts()
    } else {
        platforms
            .iter()
            .map(|p| project.config.platforms.context(p))
            .collect::<Result<_, _>>()?
    };

    tracing::info!(
        "Checking {} target(s) on {} platform(s)",
        project.targets.len(),
        contexts.len()
    );
    let result = check::check(&project, &contexts);

    if ctx.output.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for entry in &result.entries {
            match &entry.outcome {
                CheckOutcome::Ok { modules, .. } => {
                    if !ctx.output.quiet {
                        println!(
                            "{} {} on {} ({modules} modules)",
                            status::SUCCESS,
                            entry.target,
                            entry.platform
                        );
                    }
                }
                CheckOutcome::Skipped { reason } => {
                    if !ctx.output.quiet {
                        println!(
                            "{} {} on {} skipped: {reason}",
                            status::WARNING,
                            entry.target,
                            entry.platform
                        );
                    }
                }
                CheckOutcome::Failed { error } => {
                    eprintln!(
                        "{} {} on {}: {error}",
                        status::ERROR,
                        entry.target,
                        entry.platform
                    );
                }
            }
        }

        let (ok, skipped, failed) = result.counts();
        if !ctx.output.quiet {
            println!("\n{ok} resolved, {skipped} skipped, {failed} failed");
        }
    }

    if !result.is_valid() {
        let (_, _, failed) = result.counts();
        bail!("Check failed: {failed} combination(s) did not resolve");
    }
    Ok(())
}
