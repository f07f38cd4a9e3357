use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;

/// A revision expression naming one commit
///
/// Supported forms:
/// - ref names: `main`, `refs/heads/main`, `HEAD`, and the `@` alias
/// - full or abbreviated (at least 4 hex digits) object ids
/// - first parent: `<revision>^`
/// - first-parent ancestor: `<revision>~<n>`
///
/// A ref wins over an object id when a name could be both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Ref(BranchName),
    Ancestor(Box<Revision>, usize),
    Parent(Box<Revision>),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_regex = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor_regex = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent_regex.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ancestor_regex.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            Ok(Revision::Ref(BranchName::try_parse(resolved_name.to_string())?))
        }
    }

    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Ref(name) => match repository.refs().read_ref(name)? {
                Some(oid) => Ok(oid),
                None if Self::looks_like_oid(name.as_ref()) => {
                    Self::resolve_oid(name.as_ref(), repository)
                }
                None => anyhow::bail!(
                    "ambiguous argument '{}': unknown revision or path not in the working tree",
                    name
                ),
            },
            Revision::Parent(base_revision) => {
                Self::resolve_commit_parent(base_revision.resolve(repository)?, repository)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(oid, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_commit_parent(oid: ObjectId, repository: &Repository) -> anyhow::Result<ObjectId> {
        let commit = repository.database().read_commit(&oid)?;

        commit
            .parent()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("commit {} has no parent", oid.to_short_oid()))
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if oid_str.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(oid_str.to_string())?;
            Self::validate_oid_is_commit(&oid, repository)?;
            return Ok(oid);
        }

        let commit_matches = repository
            .database()
            .find_objects_by_prefix(oid_str)?
            .into_iter()
            .filter(|oid| {
                repository
                    .database()
                    .get_object_type(oid)
                    .is_ok_and(|object_type| object_type == ObjectType::Commit)
            })
            .collect::<Vec<_>>();

        match commit_matches.as_slice() {
            [] => anyhow::bail!(
                "ambiguous argument '{}': unknown revision or path not in the working tree",
                oid_str
            ),
            [oid] => Ok(oid.clone()),
            candidates => {
                let mut error_msg = format!(
                    "short SHA1 {} is ambiguous\nhint: The candidates are:",
                    oid_str
                );
                for oid in candidates {
                    error_msg.push_str(&format!("\nhint:   {} commit", oid.to_short_oid()));
                }
                anyhow::bail!(error_msg)
            }
        }
    }

    fn validate_oid_is_commit(oid: &ObjectId, repository: &Repository) -> anyhow::Result<()> {
        let object_type = repository
            .database()
            .get_object_type(oid)
            .with_context(|| format!("object {} not found", oid))?;

        if object_type != ObjectType::Commit {
            anyhow::bail!(
                "object {} is a {}, not a commit",
                oid.to_short_oid(),
                object_type
            );
        }

        Ok(())
    }

    fn looks_like_oid(s: &str) -> bool {
        (4..=OBJECT_ID_LENGTH).contains(&s.len()) && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn named(name: &str) -> Revision {
        Revision::Ref(BranchName::try_parse(name.to_string()).unwrap())
    }

    #[rstest]
    #[case("main", named("main"))]
    #[case("@", named("HEAD"))]
    #[case("main^", Revision::Parent(Box::new(named("main"))))]
    #[case("HEAD~3", Revision::Ancestor(Box::new(named("HEAD")), 3))]
    #[case("main^^", Revision::Parent(Box::new(Revision::Parent(Box::new(named("main"))))))]
    #[case("abc1234~0", Revision::Ancestor(Box::new(named("abc1234")), 0))]
    fn parses_revision_expressions(#[case] raw: &str, #[case] expected: Revision) {
        assert_eq!(Revision::try_parse(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("invalid name")]
    #[case(".invalid^")]
    #[case(".invalid~5")]
    fn rejects_invalid_revisions(#[case] raw: &str) {
        assert!(Revision::try_parse(raw).is_err());
    }
}
