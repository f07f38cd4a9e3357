use crate::areas::database::Database;
use crate::artifacts::filter::CommitFilter;
use crate::artifacts::filter::error::FilterError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use regex::Regex;

/// Matches commits whose full message matches a pattern
///
/// Stateless: reset does nothing and clones share only the compiled pattern.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    pattern: Regex,
}

impl MessageFilter {
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let pattern = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(MessageFilter { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CommitFilter for MessageFilter {
    fn include(&mut self, _: &Database, _: &ObjectId, commit: &Commit) -> anyhow::Result<bool> {
        Ok(self.pattern.is_match(commit.message()))
    }

    fn reset(&mut self) {}

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_is_rejected_at_construction() {
        let error = MessageFilter::new("fix(").unwrap_err();

        assert!(matches!(error, FilterError::InvalidPattern { ref pattern, .. } if pattern == "fix("));
        assert!(error.to_string().starts_with("Invalid message pattern 'fix('."));
    }

    #[test]
    fn keeps_the_configured_pattern() {
        let filter = MessageFilter::new("^fix").unwrap();

        assert_eq!(filter.pattern(), "^fix");
    }
}
