//! Working-directory operations
//!
//! Enumerates, reads, and stats ordinary files under the repository root.
//! All returned paths are repository-relative; `.vcs` and anything matched
//! by the ignore list never surface.

use crate::artifacts::hasher;
use crate::artifacts::ignore::IgnoreList;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::errors::{Result, VcsError};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Path components that never belong to the working tree.
const IGNORED_PATHS: [&str; 3] = [".vcs", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All regular files at or below `root` (repository-relative), skipping
    /// `.vcs` and ignored paths. A missing root is an error so callers can
    /// apply their partial-success policy.
    pub fn list_files(
        &self,
        root: Option<&Path>,
        ignores: &IgnoreList,
    ) -> Result<Vec<PathBuf>> {
        let absolute = match root {
            Some(p) => self.path.join(p),
            None => self.path.to_path_buf(),
        };
        if !absolute.exists() {
            return Err(VcsError::FileDoesNotExist(absolute));
        }
        // normalize `.` and `..` segments away so relative paths stay clean
        let absolute = absolute.canonicalize()?;

        if absolute.is_file() {
            let rel = self.relativize(&absolute)?;
            return Ok(vec![rel]);
        }

        Ok(WalkDir::new(&absolute)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| self.relativize(entry.path()).ok())
            .filter(|rel| !Self::is_reserved(rel) && !ignores.is_ignored(rel, false))
            .collect())
    }

    /// Immediate children of a directory (repository-relative), skipping
    /// `.vcs` and ignored paths. Used by the status scan.
    pub fn list_dir(&self, dir: Option<&Path>, ignores: &IgnoreList) -> Result<Vec<PathBuf>> {
        let absolute = match dir {
            Some(p) => self.path.join(p),
            None => self.path.to_path_buf(),
        };
        if !absolute.is_dir() {
            return Err(VcsError::FileDoesNotExist(absolute));
        }
        let absolute = absolute.canonicalize()?;

        let mut children = Vec::new();
        for entry in std::fs::read_dir(&absolute)? {
            let entry = entry?;
            let rel = self.relativize(&entry.path())?;
            let is_dir = entry.path().is_dir();
            if !Self::is_reserved(&rel) && !ignores.is_ignored(&rel, is_dir) {
                children.push(rel);
            }
        }
        children.sort();
        Ok(children)
    }

    /// Read a file's contents. Rejects files above the 2 GiB object limit
    /// before reading a byte.
    pub fn read_file(&self, rel: &Path) -> Result<Bytes> {
        let absolute = self.path.join(rel);
        hasher::check_file_size(&absolute)?;

        Ok(std::fs::read(&absolute)?.into())
    }

    /// Stat metadata of a file, for index entries and change detection.
    pub fn stat_file(&self, rel: &Path) -> Result<EntryMetadata> {
        let absolute = self.path.join(rel);
        let metadata = std::fs::metadata(&absolute).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => VcsError::FileDoesNotExist(absolute.clone()),
            _ => VcsError::Io(err),
        })?;

        (rel, metadata).try_into()
    }

    pub fn is_dir(&self, rel: &Path) -> bool {
        self.path.join(rel).is_dir()
    }

    pub fn is_file(&self, rel: &Path) -> bool {
        self.path.join(rel).is_file()
    }

    /// Streaming blob identity of a working-tree file.
    pub fn hash_file(&self, rel: &Path) -> Result<crate::artifacts::objects::object_id::ObjectId> {
        hasher::hash_file(&self.path.join(rel))
    }

    fn relativize(&self, absolute: &Path) -> Result<PathBuf> {
        absolute
            .strip_prefix(self.path.as_ref())
            .map(Path::to_path_buf)
            .map_err(|_| VcsError::InvalidPath(absolute.display().to_string()))
    }

    fn is_reserved(rel: &Path) -> bool {
        rel.components().any(|component| {
            matches!(
                component,
                std::path::Component::Normal(name)
                    if IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        (dir, workspace)
    }

    #[test]
    fn lists_nested_files_relative_to_the_root() {
        let (dir, workspace) = temp_workspace();
        std::fs::write(dir.path().join("a.txt"), "one").unwrap();
        std::fs::create_dir_all(dir.path().join("sub/deep")).unwrap();
        std::fs::write(dir.path().join("sub/deep/b.txt"), "two").unwrap();
        std::fs::create_dir_all(dir.path().join(".vcs/objects")).unwrap();
        std::fs::write(dir.path().join(".vcs/index"), "").unwrap();

        let mut files = workspace.list_files(None, &IgnoreList::default()).unwrap();
        files.sort();

        assert_eq!(
            files,
            vec![PathBuf::from("a.txt"), PathBuf::from("sub/deep/b.txt")]
        );
    }

    #[test]
    fn honors_the_ignore_list() {
        let (dir, workspace) = temp_workspace();
        std::fs::write(dir.path().join("keep.txt"), "k").unwrap();
        std::fs::create_dir_all(dir.path().join("build")).unwrap();
        std::fs::write(dir.path().join("build/out.o"), "o").unwrap();

        let ignores = IgnoreList::parse("build/\n").unwrap();
        let files = workspace.list_files(None, &ignores).unwrap();

        assert_eq!(files, vec![PathBuf::from("keep.txt")]);
    }

    #[test]
    fn missing_roots_are_errors() {
        let (_dir, workspace) = temp_workspace();
        assert!(matches!(
            workspace.list_files(Some(Path::new("nope")), &IgnoreList::default()),
            Err(VcsError::FileDoesNotExist(_))
        ));
    }

    #[test]
    fn stat_captures_size_and_mode() {
        let (dir, workspace) = temp_workspace();
        std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();

        let stat = workspace.stat_file(Path::new("a.txt")).unwrap();
        assert_eq!(stat.size, 6);
        assert_eq!(
            stat.mode,
            crate::artifacts::index::entry_mode::EntryMode::Regular
        );
    }
}
