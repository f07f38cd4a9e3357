//! Filters over the changes a commit introduces
//!
//! [`CommitDiffFilter`] computes the merge-aware diff of every commit it
//! visits and hands the entries to a [`DiffHook`]. The hook's answer is the
//! filter's answer. Hooks carry their own run state; the filter resets and
//! clones them through [`DiffHook::reset`] and [`DiffHook::fresh`].

use crate::areas::database::Database;
use crate::artifacts::diff::diff_entry::{ChangeKinds, DiffEntry};
use crate::artifacts::filter::CommitFilter;
use crate::artifacts::filter::error::FilterError;
use crate::artifacts::filter::path_trie::PathTrie;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::fmt::Debug;

pub trait DiffHook: Debug {
    /// Decide on a commit given the changes it introduces
    fn include(
        &mut self,
        _database: &Database,
        _oid: &ObjectId,
        _commit: &Commit,
        _diffs: &[DiffEntry],
    ) -> anyhow::Result<bool> {
        Ok(true)
    }

    fn reset(&mut self) {}

    /// Same configuration, fresh run state
    fn fresh(&self) -> Self
    where
        Self: Sized;
}

#[derive(Debug)]
pub struct CommitDiffFilter<H> {
    hook: H,
}

impl<H: DiffHook> CommitDiffFilter<H> {
    pub fn new(hook: H) -> Self {
        CommitDiffFilter { hook }
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }
}

impl<H: DiffHook + 'static> CommitFilter for CommitDiffFilter<H> {
    fn include(
        &mut self,
        database: &Database,
        oid: &ObjectId,
        commit: &Commit,
    ) -> anyhow::Result<bool> {
        let diffs = database.commit_diff(commit)?;

        self.hook.include(database, oid, commit, &diffs)
    }

    fn reset(&mut self) {
        self.hook.reset();
    }

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        Box::new(CommitDiffFilter::new(self.hook.fresh()))
    }
}

/// Accepts every commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptAll;

impl DiffHook for AcceptAll {
    fn fresh(&self) -> Self {
        AcceptAll
    }
}

/// Commits introducing at least one change of the given kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeKindHook {
    kinds: ChangeKinds,
}

impl ChangeKindHook {
    pub fn new(kinds: ChangeKinds) -> Self {
        ChangeKindHook { kinds }
    }

    /// Parse `--diff-filter` letters, e.g. `"AM"`
    pub fn parse(kinds: &str) -> Result<Self, FilterError> {
        ChangeKinds::try_parse(kinds)
            .map(Self::new)
            .ok_or_else(|| FilterError::UnknownChangeKind(kinds.to_string()))
    }

    pub fn kinds(&self) -> ChangeKinds {
        self.kinds
    }
}

impl DiffHook for ChangeKindHook {
    fn include(
        &mut self,
        _: &Database,
        _: &ObjectId,
        _: &Commit,
        diffs: &[DiffEntry],
    ) -> anyhow::Result<bool> {
        Ok(diffs.iter().any(|diff| diff.kind().matches(self.kinds)))
    }

    fn fresh(&self) -> Self {
        self.clone()
    }
}

/// Commits touching one of the given files or directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHook {
    paths: PathTrie,
}

impl PathHook {
    pub fn new<P: AsRef<str>>(paths: impl IntoIterator<Item = P>) -> Self {
        PathHook {
            paths: PathTrie::new(paths),
        }
    }
}

impl DiffHook for PathHook {
    fn include(
        &mut self,
        _: &Database,
        _: &ObjectId,
        _: &Commit,
        diffs: &[DiffEntry],
    ) -> anyhow::Result<bool> {
        Ok(diffs.iter().any(|diff| self.paths.covers(diff.path())))
    }

    fn fresh(&self) -> Self {
        self.clone()
    }
}

/// Collects the changes of every commit it sees, in visit order
#[derive(Debug, Default)]
pub struct DiffCollector {
    changes: Vec<(ObjectId, Vec<DiffEntry>)>,
}

impl DiffCollector {
    pub fn new() -> Self {
        DiffCollector::default()
    }

    pub fn changes(&self) -> &[(ObjectId, Vec<DiffEntry>)] {
        &self.changes
    }

    pub fn entries(&self) -> impl Iterator<Item = &DiffEntry> {
        self.changes.iter().flat_map(|(_, diffs)| diffs)
    }
}

impl DiffHook for DiffCollector {
    fn include(
        &mut self,
        _: &Database,
        oid: &ObjectId,
        _: &Commit,
        diffs: &[DiffEntry],
    ) -> anyhow::Result<bool> {
        self.changes.push((oid.clone(), diffs.to_vec()));
        Ok(true)
    }

    fn reset(&mut self) {
        self.changes.clear();
    }

    fn fresh(&self) -> Self {
        DiffCollector::new()
    }
}

pub type ChangeKindFilter = CommitDiffFilter<ChangeKindHook>;
pub type PathFilter = CommitDiffFilter<PathHook>;
