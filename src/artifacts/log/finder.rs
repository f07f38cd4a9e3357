//! Walk driver
//!
//! [`CommitFinder`] walks history and evaluates two optional filters on every
//! visited commit:
//!
//! - the *matcher* decides whether the commit is reported; a `false` skips
//!   the commit and the walk goes on
//! - the *filter* runs on matched commits only; a `false` stops the walk
//!   before the commit is reported
//!
//! Without a matcher every commit matches; without a filter the walk ends when
//! history does.

use crate::areas::database::Database;
use crate::artifacts::filter::CommitFilter;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub visited: usize,
    pub matched: usize,
    /// The filter ended the walk before history was exhausted
    pub stopped: bool,
}

/// Clones carry fresh filter state, never the state of the original
#[derive(Debug, Clone, Default)]
pub struct CommitFinder {
    matcher: Option<Box<dyn CommitFilter>>,
    filter: Option<Box<dyn CommitFilter>>,
}

impl CommitFinder {
    pub fn new() -> Self {
        CommitFinder::default()
    }

    pub fn with_matcher(mut self, matcher: impl CommitFilter + 'static) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    pub fn with_filter(mut self, filter: impl CommitFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn matcher(&self) -> Option<&dyn CommitFilter> {
        self.matcher.as_deref()
    }

    pub fn filter(&self) -> Option<&dyn CommitFilter> {
        self.filter.as_deref()
    }

    pub fn reset(&mut self) {
        self.matcher.iter_mut().for_each(|matcher| matcher.reset());
        self.filter.iter_mut().for_each(|filter| filter.reset());
    }

    /// Walk from `starts`, reporting each matched commit to `on_match`
    ///
    /// Filter state carries over from earlier walks; call [`reset`](Self::reset)
    /// in between for an independent walk. Read failures abort the walk; commits
    /// already reported stay reported.
    pub fn find(
        &mut self,
        database: &Database,
        starts: impl IntoIterator<Item = ObjectId>,
        mut on_match: impl FnMut(&ObjectId, &Commit) -> anyhow::Result<()>,
    ) -> anyhow::Result<WalkSummary> {
        let mut summary = WalkSummary::default();

        for visited in RevList::new(database, starts)? {
            let (oid, commit) = visited?;
            summary.visited += 1;

            if let Some(matcher) = &mut self.matcher
                && !matcher.include(database, &oid, &commit)?
            {
                continue;
            }

            if let Some(filter) = &mut self.filter
                && !filter.include(database, &oid, &commit)?
            {
                tracing::debug!(commit = %oid, "filter stopped the walk");
                summary.stopped = true;
                break;
            }

            summary.matched += 1;
            on_match(&oid, &commit)?;
        }

        tracing::info!(
            visited = summary.visited,
            matched = summary.matched,
            stopped = summary.stopped,
            "walk finished"
        );

        Ok(summary)
    }

    /// One independent walk per start, each on cloned filters
    ///
    /// This finder's own filters are left untouched.
    pub fn find_each<K>(
        &self,
        database: &Database,
        starts: impl IntoIterator<Item = (K, ObjectId)>,
        mut on_match: impl FnMut(&K, &ObjectId, &Commit) -> anyhow::Result<()>,
    ) -> anyhow::Result<Vec<(K, WalkSummary)>> {
        let mut summaries = Vec::new();

        for (key, start) in starts {
            let mut finder = self.clone();
            let summary = finder.find(database, [start], |oid, commit| {
                on_match(&key, oid, commit)
            })?;

            summaries.push((key, summary));
        }

        Ok(summaries)
    }
}
