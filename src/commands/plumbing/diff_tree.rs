use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;

impl Repository {
    /// Print the changes a commit introduces, merge-aware
    ///
    /// Output is the commit id followed by one `<status>\t<path>` line per entry.
    pub fn diff_tree(&self, revision: &str) -> anyhow::Result<()> {
        let oid = Revision::try_parse(revision)?.resolve(self)?;
        let commit = self.database().read_commit(&oid)?;
        let diffs = self.database().commit_diff(&commit)?;

        writeln!(self.writer(), "{oid}")?;
        for diff in &diffs {
            writeln!(
                self.writer(),
                "{}\t{}",
                diff.kind().status_char(),
                diff.path()
            )?;
        }

        Ok(())
    }
}
