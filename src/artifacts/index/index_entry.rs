//! Index entry representation
//!
//! Each entry records one tracked file: its repository-relative path, blob
//! id, and the stat metadata used for fast change detection.
//!
//! ## Binary layout (little-endian)
//!
//! ```text
//! offset  0: ctime_sec, ctime_nsec, mtime_sec, mtime_nsec   4 x u32
//! offset 16: dev, ino, mode, uid, gid, size                 6 x u32
//! offset 40: object id                                      32 raw bytes
//! offset 72: flags = len(path) & 0x0FFF                     u16
//! offset 74: path bytes, NUL-terminated
//!            NUL padding to the next 8-byte boundary
//! ```
//!
//! The padding guarantees every serialized entry ends with at least one NUL,
//! which is what the block-wise reader keys on.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Result, VcsError};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Mask applied to the path length stored in the flags field.
const FLAGS_PATH_MASK: usize = 0x0FFF;

/// Byte offset where the path begins within an entry.
const ENTRY_FIXED_SIZE: usize = 74;

/// Serialized entries are padded to this alignment.
pub const ENTRY_BLOCK: usize = 8;

/// Smallest possible serialized entry (one-byte path, padded).
pub const ENTRY_MIN_SIZE: usize = 80;

/// One tracked file in the staging index.
#[derive(Debug, Clone, Default, new)]
pub struct IndexEntry {
    /// Repository-relative, forward-slash separated path
    pub path: PathBuf,
    /// Blob id of the staged content
    pub oid: ObjectId,
    /// Stat metadata captured when the entry was staged
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn basename(&self) -> Result<&str> {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| VcsError::InvalidPath(self.path.display().to_string()))
    }

    /// All ancestor directories of this entry, outermost first.
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = Vec::new();
        let mut parent = self.path.parent();

        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            dirs.push(dir);
            parent = dir.parent();
        }
        dirs.reverse();
        dirs
    }

    /// Cheap change check: size and mode.
    pub fn stat_match(&self, other: &EntryMetadata) -> bool {
        (self.metadata.size == 0 || self.metadata.size == other.size)
            && self.metadata.mode == other.mode
    }

    /// Timestamp check: both ctime and mtime with nanoseconds.
    pub fn times_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.ctime == other.ctime
            && self.metadata.ctime_nsec == other.ctime_nsec
            && self.metadata.mtime == other.mtime
            && self.metadata.mtime_nsec == other.mtime_nsec
    }

    pub fn serialize(&self) -> Result<Bytes> {
        let path = self
            .path
            .to_str()
            .ok_or_else(|| VcsError::InvalidPath(self.path.display().to_string()))?;
        if path.as_bytes().contains(&0) {
            return Err(VcsError::InvalidPath(path.to_string()));
        }

        let mut entry_bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + path.len() + ENTRY_BLOCK);
        entry_bytes.write_u32::<LittleEndian>(self.metadata.ctime as u32)?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.ctime_nsec as u32)?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.mtime as u32)?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.mtime_nsec as u32)?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.dev as u32)?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.ino as u32)?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.mode.as_u32())?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<LittleEndian>(self.metadata.size as u32)?;
        self.oid.write_raw_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<LittleEndian>((path.len() & FLAGS_PATH_MASK) as u16)?;
        entry_bytes.write_all(path.as_bytes())?;

        // at least one terminating NUL, then pad to the block boundary
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(VcsError::IndexEntry(format!(
                "entry truncated at {} bytes",
                bytes.len()
            )));
        }

        let ctime = LittleEndian::read_u32(&bytes[0..4]) as i64;
        let ctime_nsec = LittleEndian::read_u32(&bytes[4..8]) as i64;
        let mtime = LittleEndian::read_u32(&bytes[8..12]) as i64;
        let mtime_nsec = LittleEndian::read_u32(&bytes[12..16]) as i64;
        let dev = LittleEndian::read_u32(&bytes[16..20]) as u64;
        let ino = LittleEndian::read_u32(&bytes[20..24]) as u64;
        let mode = EntryMode::from(LittleEndian::read_u32(&bytes[24..28]));
        let uid = LittleEndian::read_u32(&bytes[28..32]);
        let gid = LittleEndian::read_u32(&bytes[32..36]);
        let size = LittleEndian::read_u32(&bytes[36..40]) as u64;
        let oid = ObjectId::read_raw_from(&mut &bytes[40..72])?;
        let flags = LittleEndian::read_u16(&bytes[72..74]) as u32;

        let path_end = bytes[ENTRY_FIXED_SIZE..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| VcsError::IndexEntry("missing NUL after entry path".into()))?;
        let path_bytes = &bytes[ENTRY_FIXED_SIZE..ENTRY_FIXED_SIZE + path_end];
        let path = PathBuf::from(
            std::str::from_utf8(path_bytes)
                .map_err(|_| VcsError::IndexEntry("non-utf8 entry path".into()))?,
        );

        Ok(IndexEntry {
            path,
            oid,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
                flags,
            },
        })
    }
}

impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for IndexEntry {}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.path.cmp(&other.path)
    }
}

/// Stat metadata captured for change detection.
///
/// Comparing these fields lets `status` skip content hashing for files
/// whose stat information is unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: i64,
    pub ctime_nsec: i64,
    pub mtime: i64,
    pub mtime_nsec: i64,
    pub dev: u64,
    pub ino: u64,
    pub mode: EntryMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    /// Path length masked to 12 bits
    pub flags: u32,
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = VcsError;

    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self> {
        let mode = if metadata.is_dir() {
            EntryMode::Directory
        } else if metadata.mode() & 0o111 != 0 {
            EntryMode::Executable
        } else {
            EntryMode::Regular
        };
        let path_len = file_path
            .to_str()
            .ok_or_else(|| VcsError::InvalidPath(file_path.display().to_string()))?
            .len();

        Ok(Self {
            ctime: metadata.ctime(),
            ctime_nsec: metadata.ctime_nsec(),
            mtime: metadata.mtime(),
            mtime_nsec: metadata.mtime_nsec(),
            dev: metadata.dev(),
            ino: metadata.ino(),
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size(),
            flags: (path_len & FLAGS_PATH_MASK) as u32,
        })
    }
}
