use crate::areas::database::Database;
use crate::artifacts::filter::CommitFilter;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// Visit limiter
///
/// True for the first `limit` commits it is asked about, false from then on.
/// Every call counts, whatever the outcome; the counter is not clamped at the
/// limit.
#[derive(Debug)]
pub struct CommitLimitFilter {
    limit: u64,
    count: u64,
}

impl CommitLimitFilter {
    pub fn new(limit: u64) -> Self {
        CommitLimitFilter { limit, count: 0 }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl CommitFilter for CommitLimitFilter {
    fn include(&mut self, _: &Database, _: &ObjectId, _: &Commit) -> anyhow::Result<bool> {
        let under_limit = self.count < self.limit;
        self.count += 1;

        Ok(under_limit)
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        Box::new(CommitLimitFilter::new(self.limit))
    }
}
