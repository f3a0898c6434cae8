//! Platforms command implementation
//!
//! Implements `buildrules platforms` to list the platform registry.

use anyhow::Result;

use super::CommandContext;

/// Execute the platforms command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let project = ctx.load_project()?;
    let contexts = project.config.platforms.contexts();

    if ctx.output.json {
        println!("{}", serde_json::to_string_pretty(&contexts)?);
        return Ok(());
    }

    let default = project
        .config
        .default_platform
        .as_deref()
        .and_then(|p| project.config.platforms.canonical_id(p));

    for platform in &contexts {
        let marker = if Some(platform.platform.as_str()) == default {
            " (default)"
        } else {
            ""
        };
        let groups: Vec<&str> = platform.groups.iter().map(String::as_str).collect();
        println!("{}{marker}: {}", platform.platform, groups.join(", "));
    }
    Ok(())
}
