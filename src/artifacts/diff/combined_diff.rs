//! Combined diff of a merge commit
//!
//! A merge is compared against all of its parents at once. A path is reported
//! only when the merge result differs from *every* parent: if any parent
//! already holds the exact same mode and object id, the change was inherited
//! from that parent and not introduced by the merge.
//!
//! The parents' mode bits are OR-ed together, but only to tell whether any
//! parent had the path at all. The bits never end up in an entry; a combined
//! entry carries the merge result side only.

use crate::areas::database::Database;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::diff_entry::{ChangeKind, DiffEntry};
use crate::artifacts::diff::tree_diff::{ChangeSet, join_path};
use crate::artifacts::objects::entry_mode::raw_mode;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};

/// Classify a path of a merge, `None` meaning some parent already matches
///
/// `current` is the path in the merge result, `parents` the path in each
/// parent in order; `None` stands for an absent path (zero mode).
pub fn classify(
    current: Option<&DatabaseEntry>,
    parents: &[Option<&DatabaseEntry>],
) -> Option<ChangeKind> {
    let current_mode = raw_mode(current.map(|entry| &entry.mode));
    let current_oid = current.map(|entry| &entry.oid);
    let mut parent_mode = 0;

    for parent in parents {
        let mode = raw_mode(parent.map(|entry| &entry.mode));
        if mode == current_mode && parent.map(|entry| &entry.oid) == current_oid {
            return None;
        }
        parent_mode |= mode;
    }

    let kind = if parent_mode == 0 && current_mode != 0 {
        ChangeKind::Add
    } else if parent_mode != 0 && current_mode == 0 {
        ChangeKind::Delete
    } else {
        ChangeKind::Modify
    };

    Some(kind)
}

fn tree_oid(entry: Option<&DatabaseEntry>) -> Option<&ObjectId> {
    entry.filter(|entry| entry.is_tree()).map(|entry| &entry.oid)
}

fn leaf(entry: Option<&DatabaseEntry>) -> Option<&DatabaseEntry> {
    entry.filter(|entry| !entry.is_tree())
}

#[derive(Debug)]
pub struct CombinedDiff<'r> {
    database: &'r Database,
    change_set: ChangeSet,
}

impl<'r> CombinedDiff<'r> {
    pub fn new(database: &'r Database) -> Self {
        CombinedDiff {
            database,
            change_set: BTreeMap::new(),
        }
    }

    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.change_set.into_values().collect()
    }

    /// Walk the merge tree and all parent trees in lockstep
    pub fn compare_oids(
        &mut self,
        current: Option<&ObjectId>,
        parents: &[Option<&ObjectId>],
        prefix: &str,
    ) -> anyhow::Result<()> {
        // every path below matches that parent, so none can be reported
        if parents.iter().any(|parent| *parent == current) {
            return Ok(());
        }

        let current_entries = self.database.read_tree_entries(current)?;
        let parent_entries = parents
            .iter()
            .map(|parent| self.database.read_tree_entries(*parent))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let names = current_entries
            .keys()
            .chain(parent_entries.iter().flat_map(|entries| entries.keys()))
            .collect::<BTreeSet<_>>();

        for name in names {
            let path = join_path(prefix, name);
            let current_entry = current_entries.get(name);
            let parent_slots = parent_entries
                .iter()
                .map(|entries| entries.get(name))
                .collect::<Vec<_>>();

            let has_tree = current_entry
                .into_iter()
                .chain(parent_slots.iter().flatten().copied())
                .any(DatabaseEntry::is_tree);

            if has_tree {
                let parent_trees = parent_slots
                    .iter()
                    .map(|slot| tree_oid(*slot))
                    .collect::<Vec<_>>();

                self.compare_oids(tree_oid(current_entry), &parent_trees, &path)?;
            }

            let current_leaf = leaf(current_entry);
            let parent_leaves = parent_slots
                .iter()
                .map(|slot| leaf(*slot))
                .collect::<Vec<_>>();

            match classify(current_leaf, &parent_leaves) {
                Some(kind) => {
                    let diff = DiffEntry::combined(path.clone(), current_leaf.cloned(), kind);
                    self.change_set.insert(path, diff);
                }
                None => tracing::trace!(path = %path, "path matches a parent, not part of the merge"),
            }
        }

        Ok(())
    }
}
