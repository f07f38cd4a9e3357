//! Diff algorithms and tree comparison
//!
//! - `diff_entry`: One path's change between two tree states
//! - `tree_diff`: Two-tree comparison for root and single-parent commits
//! - `combined_diff`: Merge-aware comparison against all parents at once
//! - `commit_diff`: Picks the right comparison for a commit
//! - `blob_diff`: Content-level comparison producing edit spans
//!
//! Tree-level diffs answer which paths a commit changed; blob diffs answer how
//! many lines changed within them.

pub mod blob_diff;
pub mod combined_diff;
pub mod commit_diff;
pub mod diff_entry;
pub mod tree_diff;
