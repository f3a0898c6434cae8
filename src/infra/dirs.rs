//! Platform-specific directory management
//!
//! Locates the global configuration directory. Follows the XDG Base
//! Directory Specification on Linux and standard locations on macOS and
//! Windows.
//!
//! The `BUILDRULES_CONFIG_DIR` environment variable overrides the default.

use std::env;
use std::path::PathBuf;

use crate::config::defaults::GLOBAL_CONFIG_FILE;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "BUILDRULES_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "buildrules";

/// Platform-specific directory provider for buildrules
#[derive(Debug, Clone)]
pub struct BuildRulesDirs {
    config_dir: PathBuf,
}

impl BuildRulesDirs {
    /// Create a new `BuildRulesDirs` instance
    ///
    /// Checks the environment variable first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/buildrules` or `~/.config/buildrules`
    /// - macOS: `~/Library/Application Support/buildrules`
    /// - Windows: `%APPDATA%\buildrules`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(GLOBAL_CONFIG_FILE)
    }

    /// Resolve config directory from environment or platform default
    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        Self::platform_config_dir()
    }

    /// Get platform-specific config directory
    fn platform_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for BuildRulesDirs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_new_creates_instance() {
        let dirs = BuildRulesDirs::new();
        assert!(!dirs.config_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_global_config_path_is_under_config_dir() {
        let dirs = BuildRulesDirs::new();
        assert!(dirs.global_config_path().starts_with(dirs.config_dir()));
        assert!(dirs.global_config_path().ends_with("config.toml"));
    }

    #[test]
    fn test_explicit_config_dir() {
        let dirs = BuildRulesDirs::with_config_dir("/tmp/buildrules-test");
        assert_eq!(
            dirs.global_config_path(),
            PathBuf::from("/tmp/buildrules-test").join("config.toml")
        );
    }
}
