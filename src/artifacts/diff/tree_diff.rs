use crate::areas::database::{Database, TreeEntryMap};
use crate::artifacts::diff::diff_entry::DiffEntry;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;

/// Changes keyed by full path, which keeps them in path order
pub type ChangeSet = BTreeMap<String, DiffEntry>;

/// Join a tree prefix and an entry name with `/`
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Recursive comparison of two trees
///
/// Subtrees with equal ids are skipped without being read. A path that is a
/// tree on one side and a file on the other yields both the deletions/additions
/// of the tree's contents and a change for the file itself.
#[derive(Debug)]
pub struct TreeDiff<'r> {
    database: &'r Database,
    change_set: ChangeSet,
}

impl<'r> TreeDiff<'r> {
    pub fn new(database: &'r Database) -> Self {
        TreeDiff {
            database,
            change_set: BTreeMap::new(),
        }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.change_set
    }

    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.change_set.into_values().collect()
    }

    pub fn compare_oids(
        &mut self,
        old: Option<&ObjectId>,
        new: Option<&ObjectId>,
        prefix: &str,
    ) -> anyhow::Result<()> {
        if old == new {
            return Ok(());
        }

        let old_tree_entries = self.database.read_tree_entries(old)?;
        let new_tree_entries = self.database.read_tree_entries(new)?;

        self.detect_deletions(&old_tree_entries, &new_tree_entries, prefix)?;
        self.detect_additions(&old_tree_entries, &new_tree_entries, prefix)?;

        Ok(())
    }

    fn detect_deletions(
        &mut self,
        old: &TreeEntryMap,
        new: &TreeEntryMap,
        prefix: &str,
    ) -> anyhow::Result<()> {
        for (name, entry) in old {
            let other = new.get(name);

            if other == Some(entry) {
                continue;
            }

            let path = join_path(prefix, name);

            let tree_a_oid = entry.is_tree().then_some(&entry.oid);
            let tree_b_oid = other.filter(|other| other.is_tree()).map(|other| &other.oid);
            self.compare_oids(tree_a_oid, tree_b_oid, &path)?;

            let blob_a = (!entry.is_tree()).then(|| entry.clone());
            let blob_b = other.filter(|other| !other.is_tree()).cloned();

            if let Some(diff) = DiffEntry::from_entries(path.clone(), blob_a, blob_b) {
                self.change_set.insert(path, diff);
            }
        }

        Ok(())
    }

    fn detect_additions(
        &mut self,
        old: &TreeEntryMap,
        new: &TreeEntryMap,
        prefix: &str,
    ) -> anyhow::Result<()> {
        for (name, entry) in new {
            if old.contains_key(name) {
                continue;
            }

            let path = join_path(prefix, name);

            if entry.is_tree() {
                self.compare_oids(None, Some(&entry.oid), &path)?;
            } else {
                self.change_set
                    .insert(path.clone(), DiffEntry::added(path, entry.clone()));
            }
        }

        Ok(())
    }
}
