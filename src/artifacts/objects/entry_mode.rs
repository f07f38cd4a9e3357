//! Tree entry modes
//!
//! A mode is stored on disk as an octal string (`100644`, `40000`, ...). The
//! absence of a path in a tree has no mode of its own; code that needs raw
//! bits for an absent path uses [`raw_mode`], which maps `None` to `0`.

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
    /// Legacy `100664`, kept apart so its raw bits survive a read
    GroupWritable,
}

#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Symlink,
    /// A submodule commit recorded in the tree
    Gitlink,
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::File(FileMode::GroupWritable) => "100664",
            EntryMode::Symlink => "120000",
            EntryMode::Gitlink => "160000",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::File(FileMode::GroupWritable) => 0o100664,
            EntryMode::Symlink => 0o120000,
            EntryMode::Gitlink => 0o160000,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Whether the entry's object id names a blob in this repository
    pub fn has_blob_content(&self) -> bool {
        matches!(self, EntryMode::File(_) | EntryMode::Symlink)
    }

    /// Parse the octal mode found in tree objects
    ///
    /// Accepts the legacy `100664` group-writable mode and a zero-padded
    /// `040000` directory mode.
    pub fn from_octal_str(mode: &str) -> anyhow::Result<Self> {
        let bits = u32::from_str_radix(mode, 8)
            .map_err(|_| anyhow::anyhow!("Invalid entry mode {mode}"))?;

        Self::try_from(bits)
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(bits: u32) -> anyhow::Result<Self> {
        match bits {
            0o100644 => Ok(EntryMode::File(FileMode::Regular)),
            0o100664 => Ok(EntryMode::File(FileMode::GroupWritable)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o120000 => Ok(EntryMode::Symlink),
            0o160000 => Ok(EntryMode::Gitlink),
            0o40000 => Ok(EntryMode::Directory),
            _ => Err(anyhow::anyhow!("Invalid entry mode {bits:o}")),
        }
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        Self::from_octal_str(value)
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.as_u32())
    }
}

/// Raw mode bits of a possibly absent entry, `0` meaning absent
pub fn raw_mode(mode: Option<&EntryMode>) -> u32 {
    mode.map(EntryMode::as_u32).unwrap_or(0)
}
