//! Core business logic module
//!
//! This module contains the resolution model and algorithms. Descriptor
//! discovery and file reading live in [`crate::infra`]; only the
//! configuration and project loaders touch the filesystem directly.
//!
//! # Submodules
//!
//! - [`platform`] - Platform contexts, classes and the platform registry
//! - [`condition`] - Platform predicates
//! - [`module`] - Module descriptors and per-platform module resolution
//! - [`target`] - Target descriptors and settings resolution
//! - [`manifest`] - Resolution manifest and include path policy
//! - [`resolver`] - Dependency graph walk and manifest assembly
//! - [`descriptor`] - Descriptor parsing, variable substitution and validation
//! - [`config`] - Global and project configuration layers
//! - [`project`] - Project loading and target lookup
//! - [`check`] - Whole-project validation across platforms
//! - [`tree`] - Dependency tree visualization

pub mod check;
pub mod condition;
pub mod config;
pub mod descriptor;
pub mod manifest;
pub mod module;
pub mod platform;
pub mod project;
pub mod resolver;
pub mod target;
pub mod tree;
