//! Default configuration values

/// Project configuration file name
pub const PROJECT_CONFIG_FILE: &str = "buildrules.toml";

/// Global configuration file name (inside the config directory)
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Default directory scanned for descriptors, relative to the project root
pub const DEFAULT_SOURCE_DIR: &str = "Source";

/// Suffix of module descriptor files
pub const MODULE_FILE_SUFFIX: &str = ".module.toml";

/// Suffix of target descriptor files
pub const TARGET_FILE_SUFFIX: &str = ".target.toml";

/// Conventional public include directory used by legacy include path rules
pub const LEGACY_PUBLIC_DIR: &str = "Public";
