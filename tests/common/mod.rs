#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use revsift::areas::database::Database;
use revsift::areas::repository::Repository;
use revsift::artifacts::branch::branch_name::BranchName;
use revsift::artifacts::database::database_entry::DatabaseEntry;
use revsift::artifacts::objects::blob::Blob;
use revsift::artifacts::objects::commit::{Author, Commit};
use revsift::artifacts::objects::entry_mode::{EntryMode, FileMode};
use revsift::artifacts::objects::object_id::ObjectId;
use revsift::artifacts::objects::tree::Tree;
use rstest::fixture;
use sha1::{Digest, Sha1};
use std::io::Write;
use std::path::Path;

/// 2023-01-01 10:00:00 UTC
const BASE_TIMESTAMP: i64 = 1_672_567_200;

/// Repository built object by object, one minute between commits
pub struct TestRepo {
    dir: TempDir,
    repository: Repository,
    commits: i64,
}

#[fixture]
pub fn repo() -> TestRepo {
    TestRepo::new()
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repository =
            Repository::init(dir.path(), Box::new(std::io::sink())).expect("Failed to init");

        TestRepo {
            dir,
            repository,
            commits: 0,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn database(&self) -> &Database {
        self.repository.database()
    }

    pub fn file(&self, content: &str) -> DatabaseEntry {
        let oid = self
            .database()
            .store(&Blob::from(content))
            .expect("Failed to store blob");

        DatabaseEntry::new(oid, EntryMode::File(FileMode::Regular))
    }

    /// Commit a snapshot of regular files given as `(path, content)`
    pub fn commit(&mut self, parents: &[&ObjectId], files: &[(&str, &str)], message: &str) -> ObjectId {
        let entries = files
            .iter()
            .map(|(path, content)| (path.to_string(), self.file(content)))
            .collect::<Vec<_>>();

        self.commit_entries(parents, entries, message)
    }

    /// Commit a snapshot of arbitrary entries
    pub fn commit_entries(
        &mut self,
        parents: &[&ObjectId],
        entries: Vec<(String, DatabaseEntry)>,
        message: &str,
    ) -> ObjectId {
        let tree = Tree::build(entries).expect("Failed to build tree");
        let tree_oid = self.database().store_tree(&tree).expect("Failed to store tree");

        self.commit_tree(parents, tree_oid, message)
    }

    /// Commit an already stored tree
    pub fn commit_tree(&mut self, parents: &[&ObjectId], tree_oid: ObjectId, message: &str) -> ObjectId {
        let timestamp = chrono::DateTime::from_timestamp(BASE_TIMESTAMP + self.commits * 60, 0)
            .expect("Invalid timestamp")
            .fixed_offset();
        self.commits += 1;

        let author = Author::new_with_timestamp(
            "Test Author".to_string(),
            "author@example.com".to_string(),
            timestamp,
        );
        let commit = Commit::new(
            parents.iter().map(|parent| (*parent).clone()).collect(),
            tree_oid,
            author,
            message.to_string(),
        );

        self.database().store(&commit).expect("Failed to store commit")
    }

    /// Write a loose object byte for byte, bypassing the object model
    pub fn store_raw(&self, kind: &str, content: &[u8]) -> ObjectId {
        let mut object = format!("{kind} {}\0", content.len()).into_bytes();
        object.extend_from_slice(content);
        let oid = ObjectId::from_digest(&Sha1::digest(&object)).expect("Invalid digest");

        let path = self.path().join(".git").join("objects").join(oid.to_path());
        std::fs::create_dir_all(path.parent().expect("Object path without parent"))
            .expect("Failed to create object directory");

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&object).expect("Failed to compress object");
        std::fs::write(&path, encoder.finish().expect("Failed to compress object"))
            .expect("Failed to write object");

        oid
    }

    pub fn read_commit(&self, oid: &ObjectId) -> Commit {
        self.database().read_commit(oid).expect("Failed to read commit")
    }

    pub fn branch(&self, name: &str, oid: &ObjectId) {
        let name = BranchName::try_parse(name.to_string()).expect("Invalid branch name");
        self.repository
            .refs()
            .update_branch(&name, oid)
            .expect("Failed to update branch");
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("revsift").expect("Failed to find binary");
        cmd.current_dir(self.path())
            .env_remove("REVSIFT_REPO")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}
