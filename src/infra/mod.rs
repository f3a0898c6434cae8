//! Infrastructure layer
//!
//! Handles filesystem access: directory locations, descriptor discovery and
//! file reads and writes.

pub mod discovery;
pub mod dirs;
pub mod filesystem;
