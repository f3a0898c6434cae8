//! Resolve command implementation
//!
//! Implements `buildrules resolve` to print or write a target's manifest.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use super::{CommandContext, ManifestFormat};
use crate::core::manifest::ResolutionManifest;
use crate::infra::filesystem;

/// Execute the resolve command
pub fn execute(
    ctx: &CommandContext,
    target: &str,
    platform: Option<&str>,
    format: ManifestFormat,
    output: Option<&Path>,
) -> Result<()> {
    let project = ctx.load_project()?;
    let platform = project.platform(platform)?;

    tracing::info!("Resolving {target} for {platform}");
    let manifest = project.resolve(target, &platform)?;

    // --json forces JSON regardless of --format
    let format = if ctx.output.json {
        ManifestFormat::Json
    } else {
        format
    };
    let rendered = render(&manifest, format)?;

    match output {
        Some(path) => {
            filesystem::write_file(path, &rendered)?;
            ctx.output.success(&format!(
                "Wrote manifest for {target} ({}) to {}",
                platform.platform,
                path.display()
            ));
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Render a manifest in the requested format
pub fn render(manifest: &ResolutionManifest, format: ManifestFormat) -> Result<String> {
    match format {
        ManifestFormat::Json => {
            let mut json = manifest.to_json().context("Failed to serialize manifest")?;
            json.push('\n');
            Ok(json)
        }
        ManifestFormat::Toml => manifest.to_toml().context("Failed to serialize manifest"),
        ManifestFormat::Text => render_text(manifest),
    }
}

fn render_text(manifest: &ResolutionManifest) -> Result<String> {
    let settings = &manifest.target;
    let mut out = String::new();

    writeln!(
        out,
        "Target: {} ({}, {}) on {}",
        settings.name, settings.output_kind, settings.link_mode, settings.platform
    )?;

    writeln!(out, "\nModules ({}):", manifest.modules.len())?;
    for (i, module) in manifest.modules.iter().enumerate() {
        writeln!(out, "  {}. {module}", i + 1)?;
    }

    write_list(&mut out, "Include paths", manifest.include_paths.iter())?;
    write_list(
        &mut out,
        "Dynamically loaded",
        manifest.dynamically_loaded_modules.iter(),
    )?;
    write_list(&mut out, "Definitions", manifest.definitions.iter())?;
    write_list(
        &mut out,
        "Third-party libraries",
        manifest.third_party_static_dependencies.iter(),
    )?;

    if !settings.feature_flags.is_empty() {
        writeln!(out, "\nFeature flags:")?;
        for (flag, enabled) in &settings.feature_flags {
            writeln!(out, "  {flag} = {enabled}")?;
        }
    }

    writeln!(
        out,
        "\nFingerprint: {}",
        manifest.fingerprint().context("Failed to hash manifest")?
    )?;
    Ok(out)
}

fn write_list<'a>(
    out: &mut String,
    title: &str,
    items: impl ExactSizeIterator<Item = &'a String>,
) -> std::fmt::Result {
    if items.len() == 0 {
        return Ok(());
    }
    writeln!(out, "\n{title}:")?;
    for item in items {
        writeln!(out, "  • {item}")?;
    }
    Ok(())
}
