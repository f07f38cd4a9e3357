use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::diff::diff_entry::{ChangeKind, DiffEntry};
use crate::artifacts::filter::combinators::AndFilter;
use crate::artifacts::filter::diff_count::{ChangedLinesRange, LineCount};
use crate::artifacts::filter::diff_filter::{
    AcceptAll, ChangeKindFilter, ChangeKindHook, CommitDiffFilter, PathFilter, PathHook,
};
use crate::artifacts::filter::limit::CommitLimitFilter;
use crate::artifacts::filter::message::MessageFilter;
use crate::artifacts::log::finder::CommitFinder;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub revisions: Vec<String>,
    /// Walk every branch on its own instead of `revisions`
    pub all: bool,
    pub max_count: Option<u64>,
    pub grep: Option<String>,
    pub diff_filter: Option<String>,
    pub min_lines: Option<usize>,
    pub max_lines: Option<usize>,
    pub paths: Vec<String>,
    pub oneline: bool,
    pub stat: bool,
}

impl LogOptions {
    /// Finder for these options
    ///
    /// Restrictions become the matcher, cheapest first; `--max-count` becomes
    /// the stop filter so it counts shown commits only. Invalid patterns and
    /// ranges fail here, before any walk.
    pub fn finder(&self) -> anyhow::Result<CommitFinder> {
        let mut matcher = AndFilter::default();

        if let Some(pattern) = &self.grep {
            matcher = matcher.with(MessageFilter::new(pattern)?);
        }
        if let Some(kinds) = &self.diff_filter {
            matcher = matcher.with(ChangeKindFilter::new(ChangeKindHook::parse(kinds)?));
        }
        if !self.paths.is_empty() {
            matcher = matcher.with(PathFilter::new(PathHook::new(&self.paths)));
        }
        if let Some(range) = self.line_range()? {
            matcher = matcher.with(CommitDiffFilter::counting(range));
        }

        let mut finder = CommitFinder::new();
        if !matcher.children().is_empty() {
            finder = finder.with_matcher(matcher);
        }
        if let Some(max_count) = self.max_count {
            finder = finder.with_filter(CommitLimitFilter::new(max_count));
        }

        Ok(finder)
    }

    fn line_range(&self) -> anyhow::Result<Option<ChangedLinesRange>> {
        let range = match (self.min_lines, self.max_lines) {
            (None, None) => None,
            (Some(min), None) => Some(ChangedLinesRange::at_least(min)),
            (None, Some(max)) => Some(ChangedLinesRange::at_most(max)),
            (Some(min), Some(max)) => Some(ChangedLinesRange::new(min, max)?),
        };

        Ok(range)
    }
}

impl Repository {
    pub fn log(&self, options: &LogOptions) -> anyhow::Result<()> {
        let mut finder = options.finder()?;

        if options.all {
            let branches = self.refs().list_branches()?;
            let mut current_branch: Option<BranchName> = None;

            finder.find_each(self.database(), branches, |branch, oid, commit| {
                if current_branch.as_ref() != Some(branch) {
                    writeln!(self.writer(), "{}", format!("==> {} <==", branch.short_name()).bold())?;
                    current_branch = Some(branch.clone());
                }
                self.display_commit(oid, commit, options)
            })?;
        } else {
            let starts = self.start_revisions(&options.revisions)?;
            finder.find(self.database(), starts, |oid, commit| {
                self.display_commit(oid, commit, options)
            })?;
        }

        Ok(())
    }

    fn start_revisions(&self, revisions: &[String]) -> anyhow::Result<Vec<ObjectId>> {
        if revisions.is_empty() {
            let head = self
                .refs()
                .read_head()?
                .ok_or_else(|| anyhow::anyhow!("your current branch does not have any commits yet"))?;

            return Ok(vec![head]);
        }

        revisions
            .iter()
            .map(|revision| Revision::try_parse(revision)?.resolve(self))
            .collect()
    }

    fn display_commit(
        &self,
        oid: &ObjectId,
        commit: &Commit,
        options: &LogOptions,
    ) -> anyhow::Result<()> {
        if options.oneline {
            writeln!(
                self.writer(),
                "{} {}",
                oid.to_short_oid().yellow(),
                commit.short_message()
            )?;
        } else {
            self.show_commit_medium(oid, commit)?;
        }

        if options.stat {
            self.show_commit_stat(commit)?;
        }

        if !options.oneline {
            writeln!(self.writer())?;
        }

        Ok(())
    }

    fn show_commit_medium(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", format!("commit {oid}").yellow())?;
        if commit.is_merge() {
            let parents = commit
                .parents()
                .iter()
                .map(ObjectId::to_short_oid)
                .collect::<Vec<_>>();
            writeln!(self.writer(), "Merge: {}", parents.join(" "))?;
        }
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }

        Ok(())
    }

    fn show_commit_stat(&self, commit: &Commit) -> anyhow::Result<()> {
        let diffs = self.database().commit_diff(commit)?;
        let changed_lines = LineCount::new(AcceptAll).changed_lines(self.database(), &diffs)?;

        if !diffs.is_empty() {
            writeln!(self.writer())?;
        }
        for diff in &diffs {
            writeln!(self.writer(), "{}\t{}", Self::colored_status(diff), diff.path())?;
        }
        writeln!(
            self.writer(),
            " {} file(s) changed, {} line(s) changed",
            diffs.len(),
            changed_lines
        )?;

        Ok(())
    }

    fn colored_status(diff: &DiffEntry) -> colored::ColoredString {
        let status = diff.kind().status_char().to_string();

        match diff.kind() {
            ChangeKind::Add => status.green(),
            ChangeKind::Delete => status.red(),
            ChangeKind::Modify => status.yellow(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::filter::error::FilterError;

    #[test]
    fn no_options_means_no_filters() {
        let finder = LogOptions::default().finder().unwrap();

        assert!(finder.matcher().is_none());
        assert!(finder.filter().is_none());
    }

    #[test]
    fn restrictions_are_combined_into_the_matcher() {
        let options = LogOptions {
            grep: Some("fix".into()),
            paths: vec!["src".into()],
            max_count: Some(3),
            ..LogOptions::default()
        };
        let finder = options.finder().unwrap();
        let matcher = format!("{:?}", finder.matcher().unwrap());

        assert!(matcher.starts_with("AndFilter"));
        assert!(matcher.contains("MessageFilter"));
        assert!(matcher.contains("PathHook"));
        assert!(format!("{:?}", finder.filter().unwrap()).contains("limit: 3"));
    }

    #[test]
    fn inverted_line_range_fails_before_walking() {
        let options = LogOptions {
            min_lines: Some(5),
            max_lines: Some(1),
            ..LogOptions::default()
        };
        let error = options.finder().unwrap_err();

        assert!(matches!(
            error.downcast_ref::<FilterError>(),
            Some(FilterError::InvalidLineRange { min: 5, max: 1 })
        ));
    }
}
