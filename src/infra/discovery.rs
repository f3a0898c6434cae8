//! Descriptor discovery
//!
//! Finds `*.module.toml` and `*.target.toml` files under a source directory.

use std::path::{Path, PathBuf};

use crate::config::defaults::{MODULE_FILE_SUFFIX, TARGET_FILE_SUFFIX};
use crate::error::FilesystemError;

/// Descriptor files found under a source directory, each list sorted by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorFiles {
    /// Module descriptor files
    pub modules: Vec<PathBuf>,

    /// Target descriptor files
    pub targets: Vec<PathBuf>,
}

/// Walk `source_dir` recursively and collect descriptor files
///
/// A missing directory yields no descriptors. Unreadable entries are errors
/// so a partially scanned tree never resolves silently.
pub fn find_descriptors(source_dir: &Path) -> Result<DescriptorFiles, FilesystemError> {
    let mut files = DescriptorFiles::default();

    if !source_dir.exists() {
        tracing::warn!("Source directory {} does not exist", source_dir.display());
        return Ok(files);
    }

    for entry in walkdir::WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| FilesystemError::Walk {
            path: source_dir.to_path_buf(),
            error: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.ends_with(MODULE_FILE_SUFFIX) {
            files.modules.push(entry.into_path());
        } else if file_name.ends_with(TARGET_FILE_SUFFIX) {
            files.targets.push(entry.into_path());
        }
    }

    files.modules.sort();
    files.targets.sort();

    tracing::debug!(
        "Found {} module and {} target descriptors under {}",
        files.modules.len(),
        files.targets.len(),
        source_dir.display()
    );
    Ok(files)
}
