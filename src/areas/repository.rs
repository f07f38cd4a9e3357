use crate::areas::database::Database;
use crate::areas::refs::Refs;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

pub const GIT_DIR: &str = ".git";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    refs: Refs,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open the repository containing `path`, searching parent directories for `.git`
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let start = Path::new(path)
            .canonicalize()
            .with_context(|| format!("cannot access '{path}'"))?;
        let root = Self::discover(&start).with_context(|| {
            format!(
                "not a git repository (or any of the parent directories): {}",
                start.display()
            )
        })?;

        Ok(Self::open(root, writer))
    }

    /// Create the `.git` skeleton at `path` and open it
    pub fn init(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let git_dir = path.join(GIT_DIR);

        for dir in [git_dir.join("objects"), git_dir.join("refs").join("heads")] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let repository = Self::open(path.to_path_buf(), writer);
        if !repository.refs.head_path().exists() {
            std::fs::write(repository.refs.head_path(), "ref: refs/heads/main\n")
                .context("failed to write HEAD")?;
        }

        Ok(repository)
    }

    fn open(root: PathBuf, writer: Box<dyn std::io::Write>) -> Self {
        let git_dir = root.join(GIT_DIR);

        Repository {
            database: Database::new(git_dir.join("objects").into_boxed_path()),
            refs: Refs::new(git_dir.into_boxed_path()),
            writer: RefCell::new(writer),
            path: root.into_boxed_path(),
        }
    }

    fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(GIT_DIR).join("objects").is_dir())
            .map(Path::to_path_buf)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
