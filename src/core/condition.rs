//! Platform predicates
//!
//! Conditional clauses in module and target descriptors are guarded by a
//! [`Predicate`]. Evaluation is pure and total: an unknown platform or group
//! id simply does not match.
//!
//! In TOML a predicate is a single-key inline table:
//!
//! ```toml
//! when = { platform = "Mac" }
//! when = { group = "Unix" }
//! when = { not = { platform = "Win64" } }
//! when = { and = [{ group = "Linux" }, { not = { platform = "LinuxArm64" } }] }
//! when = { or = [{ platform = "Mac" }, { platform = "IOS" }] }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::platform::PlatformContext;

/// Closed set of platform predicates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Predicate {
    /// Exact platform id equality
    Platform(String),
    /// Membership in a platform group
    Group(String),
    /// Negation
    Not(Box<Predicate>),
    /// All sub-predicates match (true when empty)
    And(Vec<Predicate>),
    /// Any sub-predicate matches (false when empty)
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Exact platform predicate
    pub fn platform(id: impl Into<String>) -> Self {
        Self::Platform(id.into())
    }

    /// Group membership predicate
    pub fn group(id: impl Into<String>) -> Self {
        Self::Group(id.into())
    }

    /// Negate a predicate
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Predicate) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Evaluate against a platform context
    pub fn matches(&self, ctx: &PlatformContext) -> bool {
        match self {
            Self::Platform(id) => ctx.is_platform(id),
            Self::Group(id) => ctx.in_group(id),
            Self::Not(inner) => !inner.matches(ctx),
            Self::And(all) => all.iter().all(|p| p.matches(ctx)),
            Self::Or(any) => any.iter().any(|p| p.matches(ctx)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, op: &str, items: &[Predicate]) -> fmt::Result {
            write!(f, "{op}(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            write!(f, ")")
        }

        match self {
            Self::Platform(id) => write!(f, "platform={id}"),
            Self::Group(id) => write!(f, "group={id}"),
            Self::Not(inner) => write!(f, "not({inner})"),
            Self::And(all) => join(f, "and", all),
            Self::Or(any) => join(f, "or", any),
        }
    }
}
