//! Tree object
//!
//! A tree captures one directory level: an ordered set of
//! `(mode, name, child id)` records. Nesting is explicit through child tree
//! objects; names never contain slashes and are unique within a tree.
//!
//! On disk: `tree <size>\0` followed by concatenated records
//! `"<octal_mode> <name>\0" || raw-32-byte-hash`, sorted by name bytewise.
//! The raw hash form is canonical; hex appears only in user-facing output.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, VcsError};
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// One record of a tree: the mode and object id of a named child.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeRecord {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

/// One directory level of a snapshot.
///
/// Entries are keyed by name in a `BTreeMap`, which yields the bytewise
/// ascending order the serialized form requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, TreeRecord>,
}

impl Tree {
    /// Build a tree from already-sorted records. Empty trees are valid and
    /// have a stable hash.
    pub fn from_records(entries: BTreeMap<String, TreeRecord>) -> Self {
        Tree { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeRecord)> {
        self.entries.iter()
    }

    pub fn record(&self, name: &str) -> Option<&TreeRecord> {
        self.entries.get(name)
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content_bytes = Vec::new();
        for (name, record) in &self.entries {
            let header = format!("{} {}", record.mode.as_octal_str(), name);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            record.oid.write_raw_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::with_capacity(content_bytes.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut entries = BTreeMap::new();

        // scratch buffers reused across records
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more records
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(VcsError::StreamCorrupt("unexpected EOF in mode".into()));
            }
            let mode_str = std::str::from_utf8(&mode_bytes)
                .map_err(|_| VcsError::StreamCorrupt("non-utf8 tree entry mode".into()))?;
            let mode = EntryMode::from_octal_str(mode_str)?;

            name_bytes.clear();
            let n = reader.read_until(b'\0', &mut name_bytes)?;
            if n == 0 || name_bytes.pop() != Some(b'\0') {
                return Err(VcsError::StreamCorrupt("unexpected EOF in name".into()));
            }
            let name = std::str::from_utf8(&name_bytes)
                .map_err(|_| VcsError::StreamCorrupt("non-utf8 tree entry name".into()))?
                .to_owned();

            let oid = ObjectId::read_raw_from(&mut reader)
                .map_err(|_| VcsError::StreamCorrupt("unexpected EOF in object id".into()))?;

            entries.insert(name, TreeRecord::new(oid, mode));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
