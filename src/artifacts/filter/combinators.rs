//! Boolean composition of filters
//!
//! Children are evaluated left to right and short-circuit, so a stateful
//! child placed after a failing one is not invoked for that commit. A visit
//! limiter meant to count matched commits only goes last in an AND chain.

use crate::areas::database::Database;
use crate::artifacts::filter::CommitFilter;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// True unless a child returns false; an empty AND is true
#[derive(Debug, Default)]
pub struct AndFilter {
    children: Vec<Box<dyn CommitFilter>>,
}

impl AndFilter {
    pub fn new(children: Vec<Box<dyn CommitFilter>>) -> Self {
        AndFilter { children }
    }

    pub fn with(mut self, child: impl CommitFilter + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn children(&self) -> &[Box<dyn CommitFilter>] {
        &self.children
    }
}

impl CommitFilter for AndFilter {
    fn include(
        &mut self,
        database: &Database,
        oid: &ObjectId,
        commit: &Commit,
    ) -> anyhow::Result<bool> {
        for child in &mut self.children {
            if !child.include(database, oid, commit)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn reset(&mut self) {
        self.children.iter_mut().for_each(|child| child.reset());
    }

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        Box::new(AndFilter::new(self.children.to_vec()))
    }
}

/// True as soon as a child returns true; an empty OR is false
#[derive(Debug, Default)]
pub struct OrFilter {
    children: Vec<Box<dyn CommitFilter>>,
}

impl OrFilter {
    pub fn new(children: Vec<Box<dyn CommitFilter>>) -> Self {
        OrFilter { children }
    }

    pub fn with(mut self, child: impl CommitFilter + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn children(&self) -> &[Box<dyn CommitFilter>] {
        &self.children
    }
}

impl CommitFilter for OrFilter {
    fn include(
        &mut self,
        database: &Database,
        oid: &ObjectId,
        commit: &Commit,
    ) -> anyhow::Result<bool> {
        for child in &mut self.children {
            if child.include(database, oid, commit)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn reset(&mut self) {
        self.children.iter_mut().for_each(|child| child.reset());
    }

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        Box::new(OrFilter::new(self.children.to_vec()))
    }
}

/// Negation; the child always runs, side effects included
#[derive(Debug)]
pub struct NotFilter {
    child: Box<dyn CommitFilter>,
}

impl NotFilter {
    pub fn new(child: impl CommitFilter + 'static) -> Self {
        NotFilter {
            child: Box::new(child),
        }
    }

    pub fn from_boxed(child: Box<dyn CommitFilter>) -> Self {
        NotFilter { child }
    }
}

impl CommitFilter for NotFilter {
    fn include(
        &mut self,
        database: &Database,
        oid: &ObjectId,
        commit: &Commit,
    ) -> anyhow::Result<bool> {
        Ok(!self.child.include(database, oid, commit)?)
    }

    fn reset(&mut self) {
        self.child.reset();
    }

    fn clone_filter(&self) -> Box<dyn CommitFilter> {
        Box::new(NotFilter::from_boxed(self.child.clone_filter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::filter::count::CommitCountFilter;
    use crate::artifacts::filter::limit::CommitLimitFilter;
    use crate::artifacts::objects::commit::Author;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    /// Filter answering from a fixed script, cycling when exhausted
    #[derive(Debug)]
    struct Scripted {
        answers: Vec<bool>,
        calls: usize,
    }

    impl Scripted {
        fn new(answers: &[bool]) -> Self {
            Scripted {
                answers: answers.to_vec(),
                calls: 0,
            }
        }
    }

    impl CommitFilter for Scripted {
        fn include(&mut self, _: &Database, _: &ObjectId, _: &Commit) -> anyhow::Result<bool> {
            let answer = self.answers[self.calls % self.answers.len()];
            self.calls += 1;
            Ok(answer)
        }

        fn reset(&mut self) {
            self.calls = 0;
        }

        fn clone_filter(&self) -> Box<dyn CommitFilter> {
            Box::new(Scripted::new(&self.answers))
        }
    }

    struct Walk {
        _dir: TempDir,
        database: Database,
        oid: ObjectId,
        commit: Commit,
    }

    impl Walk {
        fn visit(&self, filter: &mut dyn CommitFilter) -> bool {
            filter
                .include(&self.database, &self.oid, &self.commit)
                .unwrap()
        }
    }

    #[fixture]
    fn walk() -> Walk {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let author = Author::new("Tester".into(), "tester@example.com".into());
        let tree_oid = "4b825dc642cb6eb9a060e54bf8d69288fbee4904".parse().unwrap();
        let commit = Commit::new(vec![], tree_oid, author, "msg".into());

        Walk {
            database: Database::new(dir.path().into()),
            _dir: dir,
            oid: "1111111111111111111111111111111111111111".parse().unwrap(),
            commit,
        }
    }

    #[rstest]
    #[case(&[], true)]
    #[case(&[true, true], true)]
    #[case(&[true, false], false)]
    #[case(&[false, true], false)]
    fn and_is_true_iff_every_child_is(walk: Walk, #[case] answers: &[bool], #[case] expected: bool) {
        let children = answers
            .iter()
            .map(|answer| Box::new(Scripted::new(&[*answer])) as Box<dyn CommitFilter>)
            .collect();

        assert_eq!(walk.visit(&mut AndFilter::new(children)), expected);
    }

    #[rstest]
    #[case(&[], false)]
    #[case(&[false, false], false)]
    #[case(&[false, true], true)]
    #[case(&[true, false], true)]
    fn or_is_true_iff_some_child_is(walk: Walk, #[case] answers: &[bool], #[case] expected: bool) {
        let children = answers
            .iter()
            .map(|answer| Box::new(Scripted::new(&[*answer])) as Box<dyn CommitFilter>)
            .collect();

        assert_eq!(walk.visit(&mut OrFilter::new(children)), expected);
    }

    #[rstest]
    fn and_skips_children_after_a_false(walk: Walk) {
        let mut and = AndFilter::default()
            .with(CommitLimitFilter::new(2))
            .with(CommitCountFilter::new());

        let results = (0..5).map(|_| walk.visit(&mut and)).collect::<Vec<_>>();

        assert_eq!(results, vec![true, true, false, false, false]);
        assert_eq!(format!("{:?}", and.children()[1]), "CommitCountFilter { count: 2 }");
    }

    #[rstest]
    fn or_skips_children_after_a_true(walk: Walk) {
        let mut or = OrFilter::default()
            .with(Scripted::new(&[true]))
            .with(CommitCountFilter::new());

        walk.visit(&mut or);
        walk.visit(&mut or);

        assert_eq!(format!("{:?}", or.children()[1]), "CommitCountFilter { count: 0 }");
    }

    #[rstest]
    fn not_always_evaluates_its_child(walk: Walk) {
        let mut not = NotFilter::new(CommitLimitFilter::new(1));

        assert_eq!(walk.visit(&mut not), false);
        assert_eq!(walk.visit(&mut not), true);
        assert_eq!(
            format!("{not:?}"),
            "NotFilter { child: CommitLimitFilter { limit: 1, count: 2 } }"
        );
    }

    #[rstest]
    fn reset_and_clone_reach_nested_children(walk: Walk) {
        let mut tree = AndFilter::default()
            .with(OrFilter::default().with(CommitLimitFilter::new(1)))
            .with(NotFilter::new(Scripted::new(&[false, true])));

        assert_eq!(walk.visit(&mut tree), true);
        assert_eq!(walk.visit(&mut tree), false);

        let mut clone = tree.clone_filter();
        assert_eq!(walk.visit(clone.as_mut()), true);

        tree.reset();
        assert_eq!(walk.visit(&mut tree), true);
    }
}
