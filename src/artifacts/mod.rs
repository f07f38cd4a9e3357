//! Git data structures and algorithms
//!
//! - `branch`: Ref names and revision parsing
//! - `database`: Database entry types
//! - `diff`: Tree diffs, the merge-aware combined diff and line counting
//! - `filter`: Composable, resettable commit filters
//! - `log`: Commit history traversal
//! - `objects`: Git object types (blob, tree, commit)

pub mod branch;
pub mod database;
pub mod diff;
pub mod filter;
pub mod log;
pub mod objects;
