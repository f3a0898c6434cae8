//! buildrules - declarative build-configuration resolver
//!
//! Resolves a build target against a platform into a manifest: the modules
//! to build in dependency order, the merged include paths, the modules
//! loaded at runtime, and the compile-time definitions.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Descriptors, platform predicates and the resolver
//! - [`infra`] - Infrastructure layer (directories, discovery, filesystem)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
