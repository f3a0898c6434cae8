//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::condition::Predicate;
    use crate::core::platform::PlatformContext;

    const PLATFORMS: &[&str] = &["Win64", "Mac", "Linux", "Android", "IOS"];
    const GROUPS: &[&str] = &["Windows", "Apple", "Unix", "Linux", "Desktop", "Mobile"];

    /// Generate a valid module name (identifier starting with an uppercase letter)
    pub fn module_name() -> impl Strategy<Value = String> {
        "[A-Z][A-Za-z0-9_]{0,15}"
    }

    /// Generate a compile-time definition (`NAME` or `NAME=VALUE`)
    pub fn definition() -> impl Strategy<Value = String> {
        ("[A-Z_][A-Z0-9_]{0,12}", proptest::option::of("[a-z0-9]{1,6}")).prop_map(
            |(name, value)| match value {
                Some(v) => format!("{name}={v}"),
                None => name,
            },
        )
    }

    /// Generate a platform context drawn from a small vocabulary
    pub fn platform_context() -> impl Strategy<Value = PlatformContext> {
        (
            proptest::sample::select(PLATFORMS),
            proptest::sample::subsequence(GROUPS, 0..=GROUPS.len()),
        )
            .prop_map(|(platform, groups)| PlatformContext::new(platform, groups))
    }

    /// Generate an arbitrary predicate over the same vocabulary
    pub fn predicate() -> impl Strategy<Value = Predicate> {
        let leaf = prop_oneof![
            proptest::sample::select(PLATFORMS).prop_map(Predicate::platform),
            proptest::sample::select(GROUPS).prop_map(Predicate::group),
        ];
        leaf.prop_recursive(3, 16, 3, |inner| {
            prop_oneof![
                inner.clone().prop_map(Predicate::not),
                proptest::collection::vec(inner.clone(), 0..3).prop_map(Predicate::And),
                proptest::collection::vec(inner, 0..3).prop_map(Predicate::Or),
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_module_name_generator(name in module_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }

        #[test]
        fn test_definition_generator(def in definition()) {
            let name = def.split('=').next().unwrap_or_default();
            prop_assert!(!name.is_empty());
        }

        #[test]
        fn test_predicate_generator_is_total(p in predicate(), ctx in platform_context()) {
            // Evaluation never panics, whatever the shape
            let _ = p.matches(&ctx);
        }
    }
}
