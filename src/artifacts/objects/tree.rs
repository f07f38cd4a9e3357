//! Git tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs),
//! symlinks, submodules and subdirectories (other trees), along with their names
//! and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are sorted by name, with directory names compared as if they ended
//! in `/`.
//!
//! ## Tree Building
//!
//! Trees can be:
//! - read back from the database (`readable_entries`)
//! - built from a flat list of `path -> entry` pairs (`writeable_entries`),
//!   creating the intermediate directories on the way

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Entry of a tree under construction
#[derive(Debug, Clone)]
enum TreeEntry {
    /// Anything that is not a nested tree (blob, symlink, gitlink)
    Leaf(DatabaseEntry),
    /// Nested tree, built in memory
    Directory(Tree),
}

impl TreeEntry {
    fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::Leaf(entry) => entry.mode,
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::Leaf(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

/// Git tree object representing a directory snapshot
///
/// Keys of `writeable_entries` carry a trailing `/` for directories so that the
/// map iterates in on-disk order.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Entries loaded from the database (read mode)
    readable_entries: BTreeMap<String, DatabaseEntry>,
    /// Entries being built (write mode)
    writeable_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree hierarchy from `path -> entry` pairs
    ///
    /// Paths use `/` as separator; the entries must not be trees themselves.
    pub fn build<P: AsRef<str>>(
        entries: impl IntoIterator<Item = (P, DatabaseEntry)>,
    ) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for (path, entry) in entries {
            let path = path.as_ref();
            if entry.is_tree() {
                anyhow::bail!("Cannot add tree entry {path} as a leaf");
            }

            let components = path
                .split('/')
                .filter(|component| !component.is_empty())
                .collect::<Vec<_>>();
            if components.is_empty() {
                anyhow::bail!("Invalid tree path {path:?}");
            }

            root.add_entry(&components, entry)?;
        }

        Ok(root)
    }

    /// Visit every built tree children-first
    ///
    /// Child ids must be known before the parent is stored, hence post-order.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for entry in self.writeable_entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }

        func(self)
    }

    fn add_entry(&mut self, components: &[&str], entry: DatabaseEntry) -> anyhow::Result<()> {
        let (name, rest) = components.split_first().context("Empty tree path")?;

        if rest.is_empty() {
            if self.writeable_entries.contains_key(&format!("{name}/")) {
                anyhow::bail!("Path {name} is already a directory");
            }
            self.writeable_entries
                .insert(name.to_string(), TreeEntry::Leaf(entry));
            return Ok(());
        }

        if self.writeable_entries.contains_key(*name) {
            anyhow::bail!("Path {name} is already a file");
        }

        let subtree = self
            .writeable_entries
            .entry(format!("{name}/"))
            .or_insert_with(|| TreeEntry::Directory(Tree::default()));

        match subtree {
            TreeEntry::Directory(tree) => tree.add_entry(rest, entry),
            TreeEntry::Leaf(_) => unreachable!("directory keys always hold trees"),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.readable_entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.readable_entries.into_iter()
    }

    /// Entries in on-disk order, whichever mode the tree is in
    fn sorted_entries(&self) -> anyhow::Result<Vec<(String, EntryMode, ObjectId)>> {
        let mut entries = self
            .writeable_entries
            .iter()
            .map(|(name, entry)| {
                Ok((
                    name.trim_end_matches('/').to_string(),
                    entry.mode(),
                    entry.oid()?,
                ))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        entries.extend(
            self.readable_entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.mode, entry.oid.clone())),
        );

        entries.sort_by_cached_key(|(name, mode, _)| {
            if mode.is_tree() {
                format!("{name}/")
            } else {
                name.clone()
            }
        });

        Ok(entries)
    }
}

impl Packable for Tree {
    fn serialize_content(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();

        for (name, mode, oid) in self.sorted_entries()? {
            write!(content, "{:o} {}", mode.as_u32(), name)?;
            content.push(0);
            oid.write_h40_to(&mut content)?;
        }

        Ok(content.into())
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();

        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                anyhow::bail!("unexpected EOF in mode");
            }

            let mode = EntryMode::from_octal_str(std::str::from_utf8(&mode_bytes)?)?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                anyhow::bail!("unexpected EOF in name");
            }
            // git allows any bytes in a name
            let name = String::from_utf8_lossy(&name_bytes).into_owned();

            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            entries.insert(name, DatabaseEntry::new(oid, mode));
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: Default::default(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.sorted_entries()
            .unwrap_or_default()
            .into_iter()
            .map(|(name, mode, oid)| {
                let object_type = if mode.is_tree() {
                    ObjectType::Tree
                } else {
                    ObjectType::Blob
                };
                format!("{} {} {}\t{}", mode.as_str(), object_type, oid, name)
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
