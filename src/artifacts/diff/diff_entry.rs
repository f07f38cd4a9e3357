use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;

bitflags! {
    /// Set of change kinds, in `--diff-filter` notation (`A`, `D`, `M`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ChangeKinds: u32 {
        const ADDED = 0b0001;
        const DELETED = 0b0010;
        const MODIFIED = 0b0100;
    }
}

impl ChangeKinds {
    /// Parse a `--diff-filter` string; `None` on an unknown letter
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut kinds = Self::empty();

        for c in s.chars() {
            match c {
                'A' => kinds |= Self::ADDED,
                'D' => kinds |= Self::DELETED,
                'M' => kinds |= Self::MODIFIED,
                _ => return None,
            }
        }

        Some(kinds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Delete,
    Modify,
}

impl ChangeKind {
    pub fn status_char(&self) -> char {
        match self {
            ChangeKind::Add => 'A',
            ChangeKind::Delete => 'D',
            ChangeKind::Modify => 'M',
        }
    }

    pub fn matches(&self, kinds: ChangeKinds) -> bool {
        match self {
            ChangeKind::Add => kinds.contains(ChangeKinds::ADDED),
            ChangeKind::Delete => kinds.contains(ChangeKinds::DELETED),
            ChangeKind::Modify => kinds.contains(ChangeKinds::MODIFIED),
        }
    }
}

/// One path's change between an old and a new tree state
///
/// Paths are `/`-separated and relative to the repository root. Old and new
/// paths are always equal since renames are not detected. A side without the
/// path has neither mode nor id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    old_path: String,
    new_path: String,
    old_mode: Option<EntryMode>,
    new_mode: Option<EntryMode>,
    old_oid: Option<ObjectId>,
    new_oid: Option<ObjectId>,
    kind: ChangeKind,
}

impl DiffEntry {
    pub fn added(path: String, new: DatabaseEntry) -> Self {
        DiffEntry {
            old_path: path.clone(),
            new_path: path,
            old_mode: None,
            new_mode: Some(new.mode),
            old_oid: None,
            new_oid: Some(new.oid),
            kind: ChangeKind::Add,
        }
    }

    pub fn deleted(path: String, old: DatabaseEntry) -> Self {
        DiffEntry {
            old_path: path.clone(),
            new_path: path,
            old_mode: Some(old.mode),
            new_mode: None,
            old_oid: Some(old.oid),
            new_oid: None,
            kind: ChangeKind::Delete,
        }
    }

    pub fn modified(path: String, old: DatabaseEntry, new: DatabaseEntry) -> Self {
        DiffEntry {
            old_path: path.clone(),
            new_path: path,
            old_mode: Some(old.mode),
            new_mode: Some(new.mode),
            old_oid: Some(old.oid),
            new_oid: Some(new.oid),
            kind: ChangeKind::Modify,
        }
    }

    /// Entry of a merge commit: only the merge result side is known
    pub fn combined(path: String, current: Option<DatabaseEntry>, kind: ChangeKind) -> Self {
        let (new_mode, new_oid) = match current {
            Some(entry) => (Some(entry.mode), Some(entry.oid)),
            None => (None, None),
        };

        DiffEntry {
            old_path: path.clone(),
            new_path: path,
            old_mode: None,
            new_mode,
            old_oid: None,
            new_oid,
            kind,
        }
    }

    /// Classify a two-sided change; `None` when both sides are equal or absent
    pub fn from_entries(
        path: String,
        old: Option<DatabaseEntry>,
        new: Option<DatabaseEntry>,
    ) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(Self::added(path, new)),
            (Some(old), None) => Some(Self::deleted(path, old)),
            (Some(old), Some(new)) if old != new => Some(Self::modified(path, old, new)),
            _ => None,
        }
    }

    pub fn old_path(&self) -> &str {
        &self.old_path
    }

    pub fn new_path(&self) -> &str {
        &self.new_path
    }

    /// The path this entry is about
    pub fn path(&self) -> &str {
        &self.new_path
    }

    pub fn old_mode(&self) -> Option<EntryMode> {
        self.old_mode
    }

    pub fn new_mode(&self) -> Option<EntryMode> {
        self.new_mode
    }

    pub fn old_oid(&self) -> Option<&ObjectId> {
        self.old_oid.as_ref()
    }

    pub fn new_oid(&self) -> Option<&ObjectId> {
        self.new_oid.as_ref()
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }
}
