//! Staging index
//!
//! The index is the persistent mapping from working-tree paths to blob
//! identities plus stat metadata: the proposed contents of the next commit.
//! It is rewritten in full on every staging operation and cleared after a
//! successful commit.
//!
//! Persistence goes through `<index>.tmp` + rename, so a reader observes
//! either the old or the new index, never a torn one. Single-process only;
//! there is no lock file.

use crate::artifacts::index::index_entry::{ENTRY_BLOCK, ENTRY_MIN_SIZE, EntryMetadata, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::errors::{Result, VcsError};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Per-entry answer of [`Index::status_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Unmodified,
    Modified,
    Added,
    Deleted,
    Untracked,
}

/// The staging area.
///
/// Besides the path-keyed entries, a directory-children map is maintained
/// so that staging `a` over a tracked directory `a/` (or the reverse)
/// evicts the conflicting entries, mirroring what the tree builder would
/// otherwise silently collapse.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.vcs/index`)
    path: Box<Path>,
    /// Tracked files keyed by repository-relative path
    entries: BTreeMap<Box<Path>, IndexEntry>,
    /// Directory path -> tracked entries beneath it
    children: BTreeMap<Box<Path>, BTreeSet<Box<Path>>>,
    /// Paths staged since the last load, for per-entry status
    fresh: BTreeSet<Box<Path>>,
    /// Whether in-memory state diverges from disk
    dirty: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            fresh: BTreeSet::new(),
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk, replacing in-memory state.
    ///
    /// An absent file yields an empty index. A bad signature or version
    /// fails with an index-header error; the header's entry count is
    /// authoritative for how many entries follow.
    pub fn load(&mut self) -> Result<()> {
        self.reset();

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read(&self.path)?;
        if content.is_empty() {
            return Ok(());
        }

        let mut reader = content.as_slice();
        let header = IndexHeader::deserialize(&mut reader)?;

        for _ in 0..header.entry_count {
            let entry = Self::read_entry(&mut reader)?;
            self.store_entry(entry);
        }

        Ok(())
    }

    /// Read one block-aligned entry: the minimum size first, then 8-byte
    /// blocks until the trailing NUL padding appears.
    fn read_entry(reader: &mut &[u8]) -> Result<IndexEntry> {
        let mut entry_bytes = vec![0u8; ENTRY_MIN_SIZE];
        reader
            .read_exact(&mut entry_bytes)
            .map_err(|_| VcsError::IndexEntry("truncated index entry".into()))?;

        while entry_bytes[entry_bytes.len() - 1] != 0 {
            let mut block = [0u8; ENTRY_BLOCK];
            reader
                .read_exact(&mut block)
                .map_err(|_| VcsError::IndexEntry("truncated index entry".into()))?;
            entry_bytes.extend_from_slice(&block);
        }

        IndexEntry::deserialize(&entry_bytes)
    }

    /// Stage an entry, evicting anything it conflicts with.
    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        self.fresh.insert(entry.path.clone().into_boxed_path());
        self.store_entry(entry);
        self.dirty = true;
    }

    /// Remove a path (and any tracked entries beneath it).
    pub fn remove(&mut self, path: &Path) {
        self.remove_entry(path);
        self.remove_children(path);
        self.dirty = true;
    }

    /// Drop every entry; the next save truncates the on-disk index.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.fresh.clear();
        self.dirty = true;
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// True when the path is a tracked file or a directory with tracked
    /// contents.
    pub fn is_directly_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path) || self.children.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Tracked paths equal to or beneath `path` (`.` matches everything).
    pub fn entries_under_path(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|entry_path| {
                if path == Path::new(".") {
                    return true;
                }
                entry_path.starts_with(path) || entry_path.as_ref() == path
            })
            .map(|p| p.to_path_buf())
            .collect()
    }

    /// Classify a single path against the index using stat metadata alone.
    ///
    /// `stat` is the current working-tree metadata, or `None` when the file
    /// does not exist.
    pub fn status_of(&self, path: &Path, stat: Option<&EntryMetadata>) -> EntryStatus {
        match (self.entries.get(path), stat) {
            (None, _) => EntryStatus::Untracked,
            (Some(_), None) => EntryStatus::Deleted,
            (Some(entry), Some(stat)) => {
                if !entry.stat_match(stat) || !entry.times_match(stat) {
                    EntryStatus::Modified
                } else if self.fresh.contains(path) {
                    EntryStatus::Added
                } else {
                    EntryStatus::Unmodified
                }
            }
        }
    }

    /// Refresh the cached stat of an entry whose content is unchanged.
    pub fn update_entry_stat(&mut self, path: &Path, stat: EntryMetadata) {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.metadata = stat;
            self.dirty = true;
        }
    }

    /// Persist the index if it changed: full rewrite to `<path>.tmp`, then
    /// rename over the live file.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let temp_path = self.path.with_extension("tmp");

        let write = || -> Result<()> {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let header = IndexHeader::with_entry_count(self.entries.len() as u32);
            file.write_all(&header.serialize()?)?;

            // BTreeMap iteration gives the sorted path order the format requires
            for entry in self.entries.values() {
                file.write_all(&entry.serialize()?)?;
            }

            file.flush()?;
            std::fs::rename(&temp_path, &self.path)?;
            Ok(())
        };

        write().inspect_err(|_| {
            let _ = std::fs::remove_file(&temp_path);
        })?;

        self.dirty = false;
        Ok(())
    }

    fn reset(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.fresh.clear();
        self.dirty = false;
    }

    /// Evict entries the new one conflicts with: any ancestor staged as a
    /// file, and any tracked children if the new entry replaces a directory.
    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            let parent = parent.to_path_buf();
            self.remove_entry(&parent);
        }
        self.remove_children(&entry.path.clone());
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_path_buf().into_boxed_path())
                .or_default()
                .insert(entry.path.clone().into_boxed_path());
        }

        self.entries
            .insert(entry.path.clone().into_boxed_path(), entry);
    }

    fn remove_children(&mut self, path: &Path) {
        if let Some(children) = self.children.remove(path) {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, path: &Path) {
        let Some(entry) = self.entries.remove(path) else {
            return;
        };
        self.fresh.remove(path);

        for parent in entry.parent_dirs() {
            if let Some(children) = self.children.get_mut(parent) {
                children.remove(path);
                if children.is_empty() {
                    self.children.remove(parent);
                }
            }
        }
    }
}
