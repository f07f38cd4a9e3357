//! Commit history filtering
//!
//! - `areas`: Repository components (object database, refs)
//! - `artifacts`: Objects, diff engines, filters and history traversal
//! - `commands`: `log` and `diff-tree` on top of a `Repository`

pub mod areas;
pub mod artifacts;
pub mod commands;
