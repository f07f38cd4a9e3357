//! Loose object database
//!
//! Objects live under `.git/objects/<xx>/<38 hex chars>`, zlib-compressed,
//! each starting with a `<type> <size>\0` header. This is the storage the
//! history walk and the diff engines read from; packfiles are not supported.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::commit_diff::CommitDiff;
use crate::artifacts::diff::diff_entry::DiffEntry;
use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::collections::BTreeMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Entries of one tree level, keyed by entry name
pub type TreeEntryMap = BTreeMap<String, DatabaseEntry>;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Two-tree comparison, `None` standing for the empty tree
    pub fn tree_diff(
        &self,
        old_oid: Option<&ObjectId>,
        new_oid: Option<&ObjectId>,
    ) -> anyhow::Result<Vec<DiffEntry>> {
        let mut tree_diff = TreeDiff::new(self);
        tree_diff.compare_oids(old_oid, new_oid, "")?;
        Ok(tree_diff.into_entries())
    }

    /// Changes attributable to `commit` itself, merge-aware
    pub fn commit_diff(&self, commit: &Commit) -> anyhow::Result<Vec<DiffEntry>> {
        CommitDiff::new(self).compute(commit)
    }

    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.read_object(self.path.join(object_id.to_path()))
    }

    /// Store an object unless it already exists, returning its id
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            let object_dir = object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?;
            std::fs::create_dir_all(object_dir).context(format!(
                "Unable to create object directory {}",
                object_dir.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
            tracing::trace!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    /// Store a built tree together with every subtree it contains
    pub fn store_tree(&self, tree: &Tree) -> anyhow::Result<ObjectId> {
        tree.traverse(&mut |subtree: &Tree| self.store(subtree).map(|_| ()))?;
        tree.object_id()
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(
                Tree::deserialize(object_reader)
                    .context(format!("Unable to parse tree {object_id}"))?,
            ))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Read a commit, failing if the object is anything else
    pub fn read_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", object_id))
    }

    /// Entries of a tree, or of a commit's root tree; `None` is the empty tree
    pub fn read_tree_entries(&self, oid: Option<&ObjectId>) -> anyhow::Result<TreeEntryMap> {
        let Some(oid) = oid else {
            return Ok(TreeEntryMap::new());
        };

        match self.parse_object(oid)? {
            ObjectBox::Tree(tree) => Ok(tree.into_entries().collect()),
            ObjectBox::Commit(commit) => self.read_tree_entries(Some(commit.tree_oid())),
            ObjectBox::Blob(_) => Err(anyhow::anyhow!("Invalid tree object {}", oid)),
        }
    }

    /// Content of a blob, `None` standing for empty content
    pub fn load_blob_content(&self, oid: Option<&ObjectId>) -> anyhow::Result<Bytes> {
        let Some(oid) = oid else {
            return Ok(Bytes::new());
        };

        self.parse_object_as_blob(oid)?
            .map(Blob::into_content)
            .ok_or_else(|| anyhow::anyhow!("object {} is not a blob", oid))
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects whose id starts with the given hex prefix
    ///
    /// More than one match means the prefix is ambiguous.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let dir_names = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255).map(|i| format!("{i:02x}")).collect()
        };

        let mut matches = Vec::new();
        for dir_name in dir_names {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let full_oid = format!("{}{}", dir_name, entry?.file_name().to_string_lossy());

                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }
}
