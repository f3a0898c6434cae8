//! Check command logic
//!
//! Resolves every target of a project on every requested platform without
//! writing any manifest, and reports which combinations resolve, which are
//! excluded by the target's platform class, and which fail.

use serde::Serialize;

use crate::core::platform::PlatformContext;
use crate::core::project::Project;
use crate::error::{BuildRulesError, ResolveError};

/// Outcome of resolving one target on one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckOutcome {
    /// Resolution succeeded
    Ok {
        /// Number of modules in the build order
        modules: usize,
        /// Manifest fingerprint
        fingerprint: String,
    },
    /// Target does not support the platform
    Skipped {
        /// Reason reported by the resolver
        reason: String,
    },
    /// Resolution failed
    Failed {
        /// Error message
        error: String,
    },
}

/// One checked `(target, platform)` combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEntry {
    /// Target name
    pub target: String,
    /// Platform id
    pub platform: String,
    /// Result
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// Result of the check operation
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    /// Every combination, in target then platform order
    pub entries: Vec<CheckEntry>,
}

impl CheckResult {
    /// Create a new check result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no combination failed
    pub fn is_valid(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Combinations that failed
    pub fn failed(&self) -> impl Iterator<Item = &CheckEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, CheckOutcome::Failed { .. }))
    }

    /// Count of (ok, skipped, failed) combinations
    pub fn counts(&self) -> (usize, usize, usize) {
        self.entries
            .iter()
            .fold((0, 0, 0), |(ok, skipped, failed), e| match e.outcome {
                CheckOutcome::Ok { .. } => (ok + 1, skipped, failed),
                CheckOutcome::Skipped { .. } => (ok, skipped + 1, failed),
                CheckOutcome::Failed { .. } => (ok, skipped, failed + 1),
            })
    }
}

/// Resolve every target of `project` on every platform in `platforms`
pub fn check(project: &Project, platforms: &[PlatformContext]) -> CheckResult {
    let mut result = CheckResult::new();

    for target in project.targets.keys() {
        for ctx in platforms {
            let outcome = match project.resolve(target, ctx) {
                Ok(manifest) => match manifest.fingerprint() {
                    Ok(fingerprint) => CheckOutcome::Ok {
                        modules: manifest.modules.len(),
                        fingerprint,
                    },
                    Err(e) => CheckOutcome::Failed {
                        error: e.to_string(),
                    },
                },
                Err(BuildRulesError::Resolve(e @ ResolveError::UnsupportedPlatform { .. })) => {
                    CheckOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
                Err(e) => CheckOutcome::Failed {
                    error: e.to_string(),
                },
            };
            tracing::debug!("Checked {target} on {ctx}: {outcome:?}");

            result.entries.push(CheckEntry {
                target: target.clone(),
                platform: ctx.platform.clone(),
                outcome,
            });
        }
    }

    result
}
