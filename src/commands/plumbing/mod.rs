//! Plumbing commands
//!
//! - `diff_tree`: Changes introduced by one commit

pub mod diff_tree;
