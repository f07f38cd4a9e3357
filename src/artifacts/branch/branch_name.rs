use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use anyhow::Context;

pub const HEADS_PREFIX: &str = "refs/heads/";

/// Name of a ref as typed by a user: `main`, `heads/main`, `refs/heads/main` or `HEAD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("branch name cannot be empty");
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            anyhow::bail!("invalid branch name: {}", name);
        }

        Ok(Self(name))
    }

    /// Name without a leading `refs/heads/`
    pub fn short_name(&self) -> &str {
        self.0.strip_prefix(HEADS_PREFIX).unwrap_or(&self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;
    use rstest::rstest;

    proptest! {
        #[test]
        fn hierarchical_names_are_valid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            assert!(BranchName::try_parse(format!("{prefix}/{suffix}")).is_ok());
        }

        #[test]
        fn special_characters_are_rejected(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~ ]"
        ) {
            assert!(BranchName::try_parse(format!("{prefix}{special_char}{suffix}")).is_err());
        }
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("/main")]
    #[case("main/")]
    #[case("main.lock")]
    #[case("a..b")]
    #[case("a@{1}")]
    fn invalid_names_are_rejected(#[case] name: &str) {
        assert!(BranchName::try_parse(name.to_string()).is_err());
    }

    #[rstest]
    #[case("refs/heads/topic", "topic")]
    #[case("topic", "topic")]
    #[case("HEAD", "HEAD")]
    fn short_name_drops_heads_prefix(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(BranchName::try_parse(name.to_string()).unwrap().short_name(), expected);
    }
}
