use crate::areas::database::Database;
use crate::artifacts::diff::combined_diff::CombinedDiff;
use crate::artifacts::diff::diff_entry::DiffEntry;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// Computes the changes a commit introduces
///
/// - root commit: every path of its tree is added
/// - one parent: plain two-tree comparison against the parent
/// - merge: combined diff against all parents
///
/// Entries come out sorted by path for identical inputs.
#[derive(Debug, new)]
pub struct CommitDiff<'r> {
    database: &'r Database,
}

impl CommitDiff<'_> {
    pub fn compute(&self, commit: &Commit) -> anyhow::Result<Vec<DiffEntry>> {
        let diffs = match commit.parents() {
            [] => self.database.tree_diff(None, Some(commit.tree_oid()))?,
            [parent] => {
                let parent_tree = self.parent_tree(parent)?;
                self.database
                    .tree_diff(Some(&parent_tree), Some(commit.tree_oid()))?
            }
            parents => {
                let parent_trees = parents
                    .iter()
                    .map(|parent| self.parent_tree(parent))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let parent_trees = parent_trees.iter().map(Some).collect::<Vec<_>>();

                let mut combined_diff = CombinedDiff::new(self.database);
                combined_diff.compare_oids(Some(commit.tree_oid()), &parent_trees, "")?;
                combined_diff.into_entries()
            }
        };

        tracing::debug!(
            tree = %commit.tree_oid(),
            parents = commit.parents().len(),
            entries = diffs.len(),
            "computed commit diff"
        );

        Ok(diffs)
    }

    fn parent_tree(&self, parent: &ObjectId) -> anyhow::Result<ObjectId> {
        Ok(self.database.read_commit(parent)?.tree_oid().clone())
    }
}
