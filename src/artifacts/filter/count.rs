//! Accumulating filters that never stop a walk

use crate::areas::database::Database;
use crate::artifacts::filter::CommitFilter;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// Counts the commits it is asked about
#[derive(Debug, Default)]
pub struct CommitCountFilter {
    count: u64,
}

impl CommitCountFilter {
    pub fn new() -> Self {
        CommitCountFilter::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl CommitFilter for CommitCountFilter {
    fn include(&mut self, _: &Database, _: &ObjectId, _: &Commit) -> anyhow::Result<bool> {
        self.count += 1;
        Ok(true)
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        Box::new(CommitCountFilter::new())
    }
}

/// Collects the ids of the commits it is asked about, in visit order
#[derive(Debug, Default)]
pub struct CommitListFilter {
    commits: Vec<ObjectId>,
}

impl CommitListFilter {
    pub fn new() -> Self {
        CommitListFilter::default()
    }

    pub fn commits(&self) -> &[ObjectId] {
        &self.commits
    }
}

impl CommitFilter for CommitListFilter {
    fn include(&mut self, _: &Database, oid: &ObjectId, _: &Commit) -> anyhow::Result<bool> {
        self.commits.push(oid.clone());
        Ok(true)
    }

    fn reset(&mut self) {
        self.commits.clear();
    }

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        Box::new(CommitListFilter::new())
    }
}
