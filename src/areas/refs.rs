//! Git references
//!
//! References are text files under `.git` holding either a 40-character object
//! id (direct) or `ref: <path>` pointing at another reference (symbolic, like
//! `HEAD` on a branch). Only loose refs are read; `packed-refs` is not.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// The `.git` directory
    path: Box<Path>,
}

#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef(String),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        match regex::Regex::new(SYMREF_REGEX)?.captures(content) {
            Some(symref_match) => Ok(Some(SymRefOrOid::SymRef(symref_match[1].to_string()))),
            None => Ok(Some(SymRefOrOid::Oid(
                ObjectId::try_parse(content.to_string())
                    .with_context(|| format!("invalid ref file at {:?}", path))?,
            ))),
        }
    }
}

impl Refs {
    /// Commit `HEAD` points at, `None` on an unborn branch
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    /// Resolve a ref name, looked up in `.git`, `.git/refs` and `.git/refs/heads`
    ///
    /// `None` if no such ref exists or it leads to an unborn branch.
    pub fn read_ref(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        for base_path in [self.path.clone(), self.refs_path(), self.heads_path()] {
            let ref_path = base_path.join(name.as_ref());

            if ref_path.is_file() {
                return self.read_symref(&ref_path);
            }
        }

        Ok(None)
    }

    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read_symref_or_oid(path)? {
            Some(SymRefOrOid::SymRef(target)) => self.read_symref(&self.path.join(target)),
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Point a branch at a commit, creating it if needed
    pub fn update_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.short_name());

        self.write_ref_file(&branch_path, oid.as_ref())
    }

    /// Make `HEAD` a symbolic ref to a branch
    pub fn set_head(&self, branch: &BranchName) -> anyhow::Result<()> {
        self.write_ref_file(
            &self.head_path(),
            &format!("ref: refs/heads/{}", branch.short_name()),
        )
    }

    /// Detach `HEAD` at a commit
    pub fn detach_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.write_ref_file(&self.head_path(), oid.as_ref())
    }

    fn write_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("invalid ref path {:?}", path))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create ref directory {:?}", parent))?;

        std::fs::write(path, format!("{raw_ref}\n"))
            .with_context(|| format!("failed to write ref file at {:?}", path))
    }

    /// Every branch with the commit it points at, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<(BranchName, ObjectId)>> {
        let heads_path = self.heads_path();
        let mut branches = Vec::new();

        if !heads_path.is_dir() {
            return Ok(branches);
        }

        for entry in WalkDir::new(&heads_path) {
            let entry = entry.context("failed to list branches")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&heads_path)
                .with_context(|| format!("branch {:?} outside of refs/heads", entry.path()))?;
            let name = BranchName::try_parse(relative_path.to_string_lossy().replace('\\', "/"))?;

            if let Some(oid) = self.read_symref(entry.path())? {
                branches.push((name, oid));
            }
        }

        branches.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(branches)
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
