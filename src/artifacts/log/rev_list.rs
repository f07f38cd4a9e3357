use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

/// A commit waiting in the queue
///
/// Newer commits come out first; among equal timestamps, the one queued
/// first does.
#[derive(Debug)]
struct Pending {
    timestamp: chrono::DateTime<chrono::FixedOffset>,
    sequence: Reverse<u64>,
    oid: ObjectId,
    commit: Commit,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// History walk over every parent of every commit
///
/// Each reachable commit is yielded once, newest committer date first. A
/// parent that cannot be read ends the walk: the child that names it is still
/// yielded, and the error follows on the next call.
#[derive(Debug)]
pub struct RevList<'r> {
    database: &'r Database,
    queue: BinaryHeap<Pending>,
    seen: HashSet<ObjectId>,
    sequence: u64,
    failure: Option<anyhow::Error>,
}

impl<'r> RevList<'r> {
    pub fn new(
        database: &'r Database,
        starts: impl IntoIterator<Item = ObjectId>,
    ) -> anyhow::Result<Self> {
        let mut rev_list = RevList {
            database,
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            sequence: 0,
            failure: None,
        };

        for start in starts {
            rev_list.enqueue(start)?;
        }

        Ok(rev_list)
    }

    fn enqueue(&mut self, oid: ObjectId) -> anyhow::Result<()> {
        if !self.seen.insert(oid.clone()) {
            return Ok(());
        }

        let commit = self.database.read_commit(&oid)?;
        self.queue.push(Pending {
            timestamp: commit.timestamp(),
            sequence: Reverse(self.sequence),
            oid,
            commit,
        });
        self.sequence += 1;

        Ok(())
    }
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.failure.take() {
            return Some(Err(error));
        }

        let Pending { oid, commit, .. } = self.queue.pop()?;

        for parent in commit.parents() {
            if let Err(error) = self.enqueue(parent.clone()) {
                self.queue.clear();
                self.failure = Some(error.context(format!("Unable to read parent of {oid}")));
                break;
            }
        }

        tracing::debug!(commit = %oid, pending = self.queue.len(), "visiting commit");
        Some(Ok((oid, commit)))
    }
}
