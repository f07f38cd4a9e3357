//! Composable commit filters
//!
//! A filter is a stateful predicate evaluated once per visited commit. Its
//! configuration is fixed at construction; its run state (counters, collected
//! entries) belongs to a single walk.
//!
//! - `reset` clears the run state in place and keeps the configuration
//! - `clone_filter` builds an independent copy with the same configuration and
//!   fresh run state, never a copy of the current run state
//!
//! Returning `false` from `include` stops the walk, or makes the enclosing
//! combinator branch false.
//!
//! - `combinators`: AND, OR and NOT over child filters
//! - `limit`: Visit limiter
//! - `count`: Commit counter and commit collector
//! - `message`: Commit message matching
//! - `diff_filter`: Filters over the changes a commit introduces
//! - `diff_count`: Filters over the number of changed lines
//! - `path_trie`: Path prefix matching for path-restricted filters

use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::fmt::Debug;

pub mod combinators;
pub mod count;
pub mod diff_count;
pub mod diff_filter;
pub mod error;
pub mod limit;
pub mod message;
pub mod path_trie;

pub trait CommitFilter: Debug {
    /// Evaluate the predicate for one visited commit
    ///
    /// Read failures propagate and abort the walk.
    fn include(
        &mut self,
        database: &Database,
        oid: &ObjectId,
        commit: &Commit,
    ) -> anyhow::Result<bool>;

    /// Return to the just-constructed state
    fn reset(&mut self);

    /// Independent copy with the same configuration and reset run state
    fn clone_filter(&self) -> Box<dyn CommitFilter>;
}

impl Clone for Box<dyn CommitFilter> {
    fn clone(&self) -> Self {
        self.clone_filter()
    }
}

impl CommitFilter for Box<dyn CommitFilter> {
    fn include(
        &mut self,
        database: &Database,
        oid: &ObjectId,
        commit: &Commit,
    ) -> anyhow::Result<bool> {
        (**self).include(database, oid, commit)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        (**self).clone_filter()
    }
}
