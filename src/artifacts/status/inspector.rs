//! Change classification
//!
//! Each path observed in any of {working tree W, index I, HEAD tree T} is
//! classified from its presence triple and content identities:
//!
//! | presence (W,I,T) | index axis                      | workspace axis               |
//! |------------------|---------------------------------|------------------------------|
//! | (1,0,0)          |                                 | Untracked                    |
//! | (1,1,0)          | Added                           | Modified unless h_W = h_I    |
//! | (1,1,1)          | Modified unless h_I = h_T       | Modified unless h_W = h_I    |
//! | (0,1,1)          |                                 | Deleted                      |
//! | (0,0,1)          | Deleted                         |                              |
//! | (0,1,0)          | Deleted                         |                              |
//! | (1,0,1)          |                                 | Modified                     |
//!
//! `h_W` is the framed blob identity of the working-tree file, so equality
//! against the index is meaningful. It is only computed when the cheap stat
//! comparison (size, mode, then timestamps) cannot already decide.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::ignore::IgnoreList;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::tree::TreeRecord;
use crate::artifacts::status::file_change::{FileChange, IndexChangeType, WorkspaceChangeType};
use crate::errors::Result;
use derive_new::new;
use std::path::Path;

/// Classifies paths against the index and HEAD tree.
#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
    ignores: &'r IgnoreList,
}

impl Inspector<'_> {
    /// Whether a path is covered by the index, directly or through its
    /// contents. Empty directories count as covered so they never show up
    /// as untracked.
    pub fn is_indirectly_tracked(&self, path: &Path, index: &Index) -> Result<bool> {
        if self.repository.workspace().is_file(path) {
            return Ok(index.is_directly_tracked(path));
        }

        let children = self
            .repository
            .workspace()
            .list_dir(Some(path), self.ignores)?;
        if children.is_empty() {
            return Ok(true);
        }

        Ok(children
            .iter()
            .any(|child| self.is_indirectly_tracked(child, index).unwrap_or(false)))
    }

    /// Classify an index entry against the working tree and HEAD tree:
    /// rows (1,1,0), (1,1,1), (0,1,1), and (0,1,0) of the table.
    pub fn classify_index_entry(
        &self,
        entry: &IndexEntry,
        stat: Option<&EntryMetadata>,
        head: Option<&TreeRecord>,
    ) -> Result<FileChange> {
        let change = match (stat, head) {
            // (0,1,1): gone from the working tree, still in HEAD
            (None, Some(_)) => FileChange {
                workspace_change: WorkspaceChangeType::Deleted,
                index_change: IndexChangeType::None,
            },
            // (0,1,0): staged but gone before ever being committed
            (None, None) => FileChange {
                workspace_change: WorkspaceChangeType::None,
                index_change: IndexChangeType::Deleted,
            },
            (Some(stat), head) => {
                let workspace_change = self.check_entry_against_workspace(entry, stat)?;
                let index_change = match head {
                    None => IndexChangeType::Added,
                    Some(record)
                        if record.oid != entry.oid || record.mode != entry.metadata.mode =>
                    {
                        IndexChangeType::Modified
                    }
                    Some(_) => IndexChangeType::None,
                };

                FileChange {
                    workspace_change,
                    index_change,
                }
            }
        };

        Ok(change)
    }

    /// Classify a HEAD path absent from the index: rows (0,0,1) and
    /// (1,0,1).
    pub fn classify_head_only(&self, path: &Path) -> FileChange {
        if self.repository.workspace().is_file(path) {
            // (1,0,1): present on disk and in HEAD with no index entry
            FileChange {
                workspace_change: WorkspaceChangeType::Modified,
                index_change: IndexChangeType::None,
            }
        } else {
            // (0,0,1): removed from both the index and the working tree
            FileChange {
                workspace_change: WorkspaceChangeType::None,
                index_change: IndexChangeType::Deleted,
            }
        }
    }

    /// Stat shortcut with content-hash fallback.
    fn check_entry_against_workspace(
        &self,
        entry: &IndexEntry,
        stat: &EntryMetadata,
    ) -> Result<WorkspaceChangeType> {
        if !entry.stat_match(stat) {
            return Ok(WorkspaceChangeType::Modified);
        }
        if entry.times_match(stat) {
            return Ok(WorkspaceChangeType::None);
        }

        // timestamps changed but size/mode did not: hash to decide
        let workspace_oid = self.repository.workspace().hash_file(&entry.path)?;
        if workspace_oid != entry.oid {
            Ok(WorkspaceChangeType::Modified)
        } else {
            Ok(WorkspaceChangeType::None)
        }
    }
}
