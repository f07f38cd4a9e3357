//! Command implementations
//!
//! - `plumbing`: Low-level commands printing raw data (`diff-tree`)
//! - `porcelain`: User-facing commands (`log`)
//!
//! Commands are methods on `Repository` writing to the repository's writer.

pub mod plumbing;
pub mod porcelain;
