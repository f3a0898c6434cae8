//! Platform identity and group membership
//!
//! A [`PlatformContext`] names one concrete platform and the groups it
//! belongs to. The [`PlatformRegistry`] holds the known platforms and is
//! extended by the global and project configuration layers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::ConfigError;

/// The platform being resolved for, plus its group memberships
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformContext {
    /// Concrete platform id (e.g. "Win64", "Linux")
    pub platform: String,

    /// Groups the platform belongs to (e.g. "Unix", "Desktop")
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl PlatformContext {
    /// Create a context from a platform id and its groups
    pub fn new<I, S>(platform: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            platform: platform.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the context is exactly the given platform
    pub fn is_platform(&self, id: &str) -> bool {
        self.platform == id
    }

    /// Whether the context belongs to the given group
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

impl fmt::Display for PlatformContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.platform)
    }
}

/// Coarse platform restriction a target may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformClass {
    /// Every platform
    #[default]
    All,
    /// Desktop platforms
    Desktop,
    /// Dedicated server platforms
    Server,
    /// Phones and tablets
    Mobile,
    /// Game consoles
    Console,
}

impl PlatformClass {
    /// Group a platform must belong to for this class, if any
    pub fn group(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Desktop => Some("Desktop"),
            Self::Server => Some("Server"),
            Self::Mobile => Some("Mobile"),
            Self::Console => Some("Console"),
        }
    }

    /// Whether the context is a member of this class
    pub fn contains(self, ctx: &PlatformContext) -> bool {
        self.group().map_or(true, |group| ctx.in_group(group))
    }
}

impl fmt::Display for PlatformClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Desktop => write!(f, "desktop"),
            Self::Server => write!(f, "server"),
            Self::Mobile => write!(f, "mobile"),
            Self::Console => write!(f, "console"),
        }
    }
}

/// Platform entry as declared in a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    /// Groups the platform belongs to
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

/// Built-in platforms and their groups
const BUILTIN_PLATFORMS: &[(&str, &[&str])] = &[
    ("Win64", &["Windows", "Microsoft", "Desktop"]),
    ("Mac", &["Apple", "Unix", "Desktop"]),
    ("Linux", &["Linux", "Unix", "Desktop"]),
    ("LinuxArm64", &["Linux", "Unix", "Desktop"]),
    ("LinuxServer", &["Linux", "Unix", "Server"]),
    ("Android", &["Android", "Unix", "Mobile"]),
    ("IOS", &["Apple", "IOS", "Mobile"]),
];

/// Known platforms, keyed by canonical id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRegistry {
    platforms: BTreeMap<String, BTreeSet<String>>,
}

impl PlatformRegistry {
    /// Registry with only the built-in platforms
    pub fn builtin() -> Self {
        let platforms = BUILTIN_PLATFORMS
            .iter()
            .map(|(id, groups)| {
                (
                    (*id).to_string(),
                    groups.iter().map(|g| (*g).to_string()).collect(),
                )
            })
            .collect();
        Self { platforms }
    }

    /// Add or replace platforms from a configuration layer
    pub fn extend(&mut self, entries: &BTreeMap<String, PlatformEntry>) {
        for (id, entry) in entries {
            // Replace under the existing spelling so lookups stay unambiguous
            let key = self.canonical_id(id).unwrap_or(id).to_string();
            tracing::debug!("Registering platform {key} with groups {:?}", entry.groups);
            self.platforms.insert(key, entry.groups.clone());
        }
    }

    /// Canonical spelling of a platform id (case-insensitive lookup)
    pub fn canonical_id(&self, name: &str) -> Option<&str> {
        self.platforms
            .keys()
            .find(|id| id.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Build the context for a platform id
    pub fn context(&self, name: &str) -> Result<PlatformContext, ConfigError> {
        let id = self
            .canonical_id(name)
            .ok_or_else(|| ConfigError::UnknownPlatform {
                name: name.to_string(),
                known: self.platforms.keys().cloned().collect(),
            })?;
        let groups = self.platforms.get(id).cloned().unwrap_or_default();
        Ok(PlatformContext {
            platform: id.to_string(),
            groups,
        })
    }

    /// Contexts for every known platform, in id order
    pub fn contexts(&self) -> Vec<PlatformContext> {
        self.platforms
            .iter()
            .map(|(id, groups)| PlatformContext {
                platform: id.clone(),
                groups: groups.clone(),
            })
            .collect()
    }

    /// Context for the platform this binary was compiled for, if known
    pub fn host(&self) -> Option<PlatformContext> {
        let id = match (std::env::consts::OS, std::env::consts::ARCH) {
            ("windows", _) => "Win64",
            ("macos", _) => "Mac",
            ("linux", "aarch64") => "LinuxArm64",
            ("linux", _) => "Linux",
            _ => return None,
        };
        self.context(id).ok()
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
