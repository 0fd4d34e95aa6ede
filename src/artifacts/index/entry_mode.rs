use crate::errors::{Result, VcsError};

/// File mode recorded in tree records and index entries.
///
/// Only three modes exist: regular file, executable file, and directory.
/// Directories always use the fixed constant `40000` regardless of the
/// platform's `S_IFDIR` value, so tree hashes are portable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMode {
    #[default]
    Regular,
    Executable,
    Directory,
}

impl EntryMode {
    pub fn as_u32(self) -> u32 {
        match self {
            EntryMode::Regular => 0o100644,
            EntryMode::Executable => 0o100755,
            EntryMode::Directory => 0o40000,
        }
    }

    /// Octal form as emitted into tree records (no leading zero).
    pub fn as_octal_str(self) -> &'static str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Executable => "100755",
            EntryMode::Directory => "40000",
        }
    }

    pub fn from_octal_str(s: &str) -> Result<Self> {
        match s {
            "100644" => Ok(EntryMode::Regular),
            "100755" => Ok(EntryMode::Executable),
            "40000" | "040000" => Ok(EntryMode::Directory),
            other => Err(VcsError::StreamCorrupt(format!(
                "unknown tree entry mode {other}"
            ))),
        }
    }

    pub fn is_tree(self) -> bool {
        self == EntryMode::Directory
    }
}

impl From<u32> for EntryMode {
    fn from(value: u32) -> Self {
        match value {
            0o100755 => EntryMode::Executable,
            0o40000 => EntryMode::Directory,
            // tolerate any stray permission bits from older writers
            v if v & 0o170000 == 0o040000 => EntryMode::Directory,
            v if v & 0o111 != 0 => EntryMode::Executable,
            _ => EntryMode::Regular,
        }
    }
}
