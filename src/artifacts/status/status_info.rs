//! Status collection
//!
//! Walks the working tree, the index, and the HEAD commit's tree, merges
//! the three views into one path-keyed map, and classifies every path.
//! Untracked directories collapse to a single `dir/` entry instead of
//! listing their contents.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::ignore::IgnoreList;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::tree::TreeRecord;
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::inspector::Inspector;
use crate::errors::Result;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub type FileStatSet = BTreeMap<PathBuf, EntryMetadata>;
pub type ChangeSet = BTreeMap<PathBuf, FileChangeType>;
pub type FileSet = BTreeSet<PathBuf>;
pub type HeadTree = BTreeMap<PathBuf, TreeRecord>;

/// Everything `status` needs to render, grouped by axis.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub untracked_files: FileSet,
    pub changed_files: BTreeMap<PathBuf, FileChange>,
    pub untracked_changeset: ChangeSet,
    pub workspace_changeset: ChangeSet,
    pub index_changeset: ChangeSet,
}

/// Three-way status collector.
#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
    ignores: &'r IgnoreList,
}

impl Status<'_> {
    /// Walk all three views and classify every observed path.
    ///
    /// Entries whose content is unchanged but whose cached stat went stale
    /// are refreshed in the index, so callers should save it afterwards.
    pub fn collect(&self, index: &mut Index) -> Result<StatusReport> {
        let inspector = Inspector::new(self.repository, self.ignores);

        let mut untracked_files = FileSet::new();
        let mut file_stats = FileStatSet::new();
        self.scan_workspace(None, &mut untracked_files, &mut file_stats, index, &inspector)?;

        let head_tree = self.load_head_tree()?;

        let mut changed_files =
            self.check_index_entries(&file_stats, &head_tree, index, &inspector)?;
        self.collect_head_paths_missing_from_index(
            &head_tree,
            index,
            &inspector,
            &mut untracked_files,
            &mut changed_files,
        );

        let untracked_changeset = untracked_files
            .iter()
            .map(|file| {
                (
                    file.clone(),
                    FileChangeType::Workspace(WorkspaceChangeType::Untracked),
                )
            })
            .collect();
        let workspace_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Workspace(change.workspace_change),
                )
            })
            .collect();
        let index_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(file, change)| (file.clone(), FileChangeType::Index(change.index_change)))
            .collect();

        Ok(StatusReport {
            untracked_files,
            changed_files,
            untracked_changeset,
            workspace_changeset,
            index_changeset,
        })
    }

    /// Recursive working-tree scan. Tracked files contribute stat metadata;
    /// untracked files and directories are reported, with directories
    /// collapsed to one entry.
    fn scan_workspace(
        &self,
        prefix: Option<&Path>,
        untracked_files: &mut FileSet,
        file_stats: &mut FileStatSet,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> Result<()> {
        let workspace = self.repository.workspace();

        for path in workspace.list_dir(prefix, self.ignores)? {
            if index.is_directly_tracked(&path) {
                if workspace.is_dir(&path) {
                    self.scan_workspace(
                        Some(&path),
                        untracked_files,
                        file_stats,
                        index,
                        inspector,
                    )?;
                } else {
                    let stat = workspace.stat_file(&path)?;
                    file_stats.insert(path, stat);
                }
            } else if !inspector.is_indirectly_tracked(&path, index)? {
                // report a directory as `dir/` rather than its contents
                let path = if workspace.is_dir(&path) {
                    let mut p = path.clone();
                    p.push("");
                    p
                } else {
                    path
                };
                untracked_files.insert(path);
            }
        }

        Ok(())
    }

    /// Flatten the HEAD commit's tree into path -> record, when HEAD has a
    /// commit at all.
    fn load_head_tree(&self) -> Result<HeadTree> {
        let mut head_tree = HeadTree::new();

        if let Some(head_oid) = self.repository.refs().current_oid()? {
            let tree_oid = self.repository.database().read_commit_tree_oid(&head_oid)?;
            self.repository
                .database()
                .read_tree_flat(&tree_oid, Path::new(""), &mut head_tree)?;
        }

        Ok(head_tree)
    }

    fn check_index_entries(
        &self,
        file_stats: &FileStatSet,
        head_tree: &HeadTree,
        index: &mut Index,
        inspector: &Inspector<'_>,
    ) -> Result<BTreeMap<PathBuf, FileChange>> {
        let mut changed_files = BTreeMap::new();
        let entries: Vec<_> = index.entries().cloned().collect();

        for entry in entries {
            let stat = file_stats.get(&entry.path);
            let head = head_tree.get(&entry.path);

            let change = inspector.classify_index_entry(&entry, stat, head)?;
            if !change.is_clean() {
                changed_files.insert(entry.path.clone(), change);
            }

            // content unchanged but the cached stat went stale: refresh it
            if change.workspace_change == WorkspaceChangeType::None
                && let Some(stat) = stat
                && !entry.times_match(stat)
            {
                index.update_entry_stat(&entry.path, stat.clone());
            }
        }

        Ok(changed_files)
    }

    /// Rows whose path exists in HEAD but not in the index.
    fn collect_head_paths_missing_from_index(
        &self,
        head_tree: &HeadTree,
        index: &Index,
        inspector: &Inspector<'_>,
        untracked_files: &mut FileSet,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        for path in head_tree.keys() {
            if !index.is_directly_tracked(path) {
                let change = inspector.classify_head_only(path);
                untracked_files.remove(path);
                changed_files.insert(path.clone(), change);
            }
        }
    }
}
