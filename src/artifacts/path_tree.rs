//! PathTree builder
//!
//! Folds a flat list of `path -> (mode, hash)` pairs into an in-memory
//! directory trie, from which nested tree objects are emitted bottom-up.
//! Children iterate in sorted name order so emitted tree hashes are
//! deterministic regardless of insertion order.
//!
//! Purely in-memory: the only failure mode is an invalid path component.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeRecord};
use crate::errors::{Result, VcsError};
use std::collections::BTreeMap;
use std::path::Path;

/// Directory trie over repository-relative paths.
///
/// Inner nodes are directories; leaves carry the blob record of a file.
/// Inserting the same path twice overwrites the payload; inserting a file
/// over a directory (or vice versa) replaces the old subtree.
#[derive(Debug, Default)]
pub struct PathTree {
    root: PathNode,
}

#[derive(Debug, Default)]
struct PathNode {
    children: BTreeMap<String, PathNode>,
    record: Option<TreeRecord>,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the trie from staged index entries.
    pub fn from_entries<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> Result<Self> {
        let mut tree = Self::new();
        for entry in entries {
            tree.insert(&entry.path, TreeRecord::new(entry.oid.clone(), entry.metadata.mode))?;
        }
        Ok(tree)
    }

    /// Insert a payload at a normalized repository-relative path.
    pub fn insert(&mut self, path: &Path, record: TreeRecord) -> Result<()> {
        let components = normalize_components(path)?;

        let mut node = &mut self.root;
        for component in &components[..components.len() - 1] {
            node = node.children.entry(component.clone()).or_default();
            // a file being turned into a directory loses its blob payload
            node.record = None;
        }

        let leaf = node
            .children
            .entry(components[components.len() - 1].clone())
            .or_default();
        // a directory being turned into a file loses its children
        leaf.children.clear();
        leaf.record = Some(record);

        Ok(())
    }

    /// Emit nested tree objects postorder through `store` and return the
    /// root tree id. The callback persists one tree and returns its id.
    ///
    /// An empty trie emits a single empty tree with a stable hash.
    pub fn write_trees<F>(&self, store: &mut F) -> Result<ObjectId>
    where
        F: FnMut(&Tree) -> Result<ObjectId>,
    {
        Self::write_node(&self.root, store)
    }

    fn write_node<F>(node: &PathNode, store: &mut F) -> Result<ObjectId>
    where
        F: FnMut(&Tree) -> Result<ObjectId>,
    {
        let mut records = BTreeMap::new();

        for (name, child) in &node.children {
            let record = if child.children.is_empty() {
                match &child.record {
                    Some(record) => record.clone(),
                    // childless inner nodes cannot be constructed via insert
                    None => continue,
                }
            } else {
                TreeRecord::new(Self::write_node(child, store)?, EntryMode::Directory)
            };
            records.insert(name.clone(), record);
        }

        store(&Tree::from_records(records))
    }
}

/// Split a repository-relative path into validated components.
///
/// Rejects empty paths, empty components, `.`, `..`, backslashes, and NUL
/// bytes.
fn normalize_components(path: &Path) -> Result<Vec<String>> {
    let invalid = || VcsError::InvalidPath(path.display().to_string());

    let raw = path.to_str().ok_or_else(invalid)?;
    if raw.is_empty() {
        return Err(invalid());
    }

    let components: Vec<String> = raw.split('/').map(str::to_string).collect();
    for component in &components {
        if component.is_empty()
            || component == "."
            || component == ".."
            || component.contains('\0')
            || component.contains('\\')
        {
            return Err(invalid());
        }
    }

    Ok(components)
}
