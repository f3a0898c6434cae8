//! CLI command for displaying dependency tree
//!
//! Implements the `buildrules tree` command.

use anyhow::Result;

use super::CommandContext;
use crate::core::tree::DependencyTree;

/// Execute the tree command
pub fn execute(
    ctx: &CommandContext,
    target: &str,
    platform: Option<&str>,
    graph: bool,
) -> Result<()> {
    let project = ctx.load_project()?;
    let platform = project.platform(platform)?;

    let resolution = project.resolve_graph(target, &platform)?;
    let tree = DependencyTree::from_resolution(&resolution);

    let output = if graph {
        tree.format_dot()
    } else {
        tree.format_tree()
    };
    println!("{output}");
    Ok(())
}
