//! Filters over the number of lines a commit changes
//!
//! [`LineCount`] is a [`DiffHook`] that runs the blob diff service on every
//! entry and passes the commit's total to a narrower [`CountHook`]. Absent
//! sides, merge entries' old side included, are compared as empty content.
//! Submodule entries never load content and count as empty.

use crate::areas::database::Database;
use crate::artifacts::diff::blob_diff::{BlobDiff, LineDiff, count_changed_lines};
use crate::artifacts::diff::diff_entry::DiffEntry;
use crate::artifacts::filter::diff_filter::{AcceptAll, CommitDiffFilter, DiffHook};
use crate::artifacts::filter::error::FilterError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::fmt::Debug;

pub trait CountHook: Debug {
    /// Decide on a commit given its total number of changed lines
    fn include(
        &mut self,
        _oid: &ObjectId,
        _commit: &Commit,
        _diffs: &[DiffEntry],
        _changed_lines: usize,
    ) -> anyhow::Result<bool> {
        Ok(true)
    }

    fn reset(&mut self) {}

    fn fresh(&self) -> Self
    where
        Self: Sized;
}

impl CountHook for AcceptAll {
    fn fresh(&self) -> Self {
        AcceptAll
    }
}

#[derive(Debug)]
pub struct LineCount<H, B = LineDiff> {
    hook: H,
    blob_diff: B,
}

impl<H: CountHook> LineCount<H> {
    pub fn new(hook: H) -> Self {
        LineCount {
            hook,
            blob_diff: LineDiff::default(),
        }
    }
}

impl<H: CountHook, B: BlobDiff> LineCount<H, B> {
    pub fn with_blob_diff(hook: H, blob_diff: B) -> Self {
        LineCount { hook, blob_diff }
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// Changed lines summed over all entries
    pub fn changed_lines(&self, database: &Database, diffs: &[DiffEntry]) -> anyhow::Result<usize> {
        let mut total = 0;

        for diff in diffs {
            let old = Self::content(database, diff.old_mode(), diff.old_oid())?;
            let new = Self::content(database, diff.new_mode(), diff.new_oid())?;

            total += count_changed_lines(&self.blob_diff, &old, &new);
        }

        Ok(total)
    }

    fn content(
        database: &Database,
        mode: Option<EntryMode>,
        oid: Option<&ObjectId>,
    ) -> anyhow::Result<Bytes> {
        match mode {
            Some(mode) if !mode.has_blob_content() => Ok(Bytes::new()),
            _ => database.load_blob_content(oid),
        }
    }
}

impl<H: CountHook, B: BlobDiff + Clone> DiffHook for LineCount<H, B> {
    fn include(
        &mut self,
        database: &Database,
        oid: &ObjectId,
        commit: &Commit,
        diffs: &[DiffEntry],
    ) -> anyhow::Result<bool> {
        let changed_lines = self.changed_lines(database, diffs)?;
        tracing::debug!(commit = %oid, changed_lines, "counted changed lines");

        self.hook.include(oid, commit, diffs, changed_lines)
    }

    fn reset(&mut self) {
        self.hook.reset();
    }

    fn fresh(&self) -> Self {
        LineCount::with_blob_diff(self.hook.fresh(), self.blob_diff.clone())
    }
}

pub type DiffCountFilter<H = AcceptAll, B = LineDiff> = CommitDiffFilter<LineCount<H, B>>;

impl<H: CountHook> CommitDiffFilter<LineCount<H>> {
    pub fn counting(hook: H) -> Self {
        CommitDiffFilter::new(LineCount::new(hook))
    }
}

/// Commits changing between `min` and `max` lines, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedLinesRange {
    min: usize,
    max: usize,
}

impl ChangedLinesRange {
    pub fn new(min: usize, max: usize) -> Result<Self, FilterError> {
        if min > max {
            return Err(FilterError::InvalidLineRange { min, max });
        }

        Ok(ChangedLinesRange { min, max })
    }

    pub fn at_least(min: usize) -> Self {
        ChangedLinesRange { min, max: usize::MAX }
    }

    pub fn at_most(max: usize) -> Self {
        ChangedLinesRange { min: 0, max }
    }

    pub fn contains(&self, changed_lines: usize) -> bool {
        (self.min..=self.max).contains(&changed_lines)
    }
}

impl CountHook for ChangedLinesRange {
    fn include(
        &mut self,
        _: &ObjectId,
        _: &Commit,
        _: &[DiffEntry],
        changed_lines: usize,
    ) -> anyhow::Result<bool> {
        Ok(self.contains(changed_lines))
    }

    fn fresh(&self) -> Self {
        *self
    }
}

/// Records each visited commit's changed-line total, in visit order
#[derive(Debug, Default)]
pub struct CountCollector {
    counts: Vec<(ObjectId, usize)>,
}

impl CountCollector {
    pub fn new() -> Self {
        CountCollector::default()
    }

    pub fn counts(&self) -> &[(ObjectId, usize)] {
        &self.counts
    }
}

impl CountHook for CountCollector {
    fn include(
        &mut self,
        oid: &ObjectId,
        _: &Commit,
        _: &[DiffEntry],
        changed_lines: usize,
    ) -> anyhow::Result<bool> {
        self.counts.push((oid.clone(), changed_lines));
        Ok(true)
    }

    fn reset(&mut self) {
        self.counts.clear();
    }

    fn fresh(&self) -> Self {
        CountCollector::new()
    }
}
