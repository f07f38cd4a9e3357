//! Commit history traversal
//!
//! - `rev_list`: Walk over all parents, newest commit first
//! - `finder`: Drives a walk through matcher and stop filters
//!
//! ## Algorithm
//!
//! The walk uses a priority queue ordered by committer timestamp and visits
//! every commit reachable from the starting points exactly once, so merge
//! commits and both sides of their history are all seen.

pub mod finder;
pub mod rev_list;
