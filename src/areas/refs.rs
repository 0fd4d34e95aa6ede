//! References (HEAD and branches)
//!
//! A ref is a text file holding either the hex hash of a branch tip (plus
//! newline) or nothing at all (a branch with no commits yet). HEAD is
//! either attached (`ref: refs/heads/<name>\n`) or detached (a bare hash).
//!
//! Ref files are replaced through temp-file + rename. Branch names are
//! treated as opaque filesystem-safe tokens; validating them is the command
//! layer's job.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Result, VcsError};
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// Pattern recognizing an attached HEAD.
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Name of the default branch created by `init`.
pub const DEFAULT_BRANCH: &str = "master";

/// Parsed content of the HEAD file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    /// HEAD points at a branch
    Attached(String),
    /// HEAD points directly at a commit
    Detached(ObjectId),
}

/// Reference manager rooted at the `.vcs` directory.
#[derive(Debug)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs { path }
    }

    /// Parse HEAD. Fails with `NoHead` when the file is missing and
    /// `InvalidHead` when its content is neither a symref nor a hash.
    pub fn read_head(&self) -> Result<HeadRef> {
        let head_path = self.head_path();
        if !head_path.exists() {
            return Err(VcsError::NoHead);
        }

        let content = std::fs::read_to_string(&head_path)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(VcsError::InvalidHead("HEAD is empty".into()));
        }

        let symref = regex::Regex::new(SYMREF_REGEX)
            .expect("symref pattern is valid")
            .captures(content);
        match symref {
            Some(captures) => Ok(HeadRef::Attached(captures[1].to_string())),
            None => ObjectId::try_parse(content.to_string())
                .map(HeadRef::Detached)
                .map_err(|_| VcsError::InvalidHead(content.to_string())),
        }
    }

    /// Commit id of a branch tip. Absent or empty ref files mean the branch
    /// has no commits yet.
    pub fn read_branch_tip(&self, name: &str) -> Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(name);
        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    /// Point a branch at a commit.
    pub fn write_branch_tip(&self, name: &str, oid: &ObjectId) -> Result<()> {
        self.write_ref_file(&self.heads_path().join(name), &format!("{oid}\n"))
    }

    /// Attach HEAD to a branch.
    pub fn write_head_attached(&self, name: &str) -> Result<()> {
        self.write_ref_file(&self.head_path(), &format!("ref: refs/heads/{name}\n"))
    }

    /// Resolve HEAD to the current commit, if any. An attached HEAD on an
    /// unborn branch resolves to `None`.
    pub fn current_oid(&self) -> Result<Option<ObjectId>> {
        match self.read_head()? {
            HeadRef::Attached(branch) => self.read_branch_tip(&branch),
            HeadRef::Detached(oid) => Ok(Some(oid)),
        }
    }

    /// Advance the current branch (or a detached HEAD) to a new commit.
    pub fn update_current(&self, oid: &ObjectId) -> Result<()> {
        match self.read_head()? {
            HeadRef::Attached(branch) => self.write_branch_tip(&branch, oid),
            HeadRef::Detached(_) => self.write_ref_file(&self.head_path(), &format!("{oid}\n")),
        }
    }

    /// Create a branch pointing at `oid`. Fails when one already exists.
    pub fn create_branch(&self, name: &str, oid: &ObjectId) -> Result<()> {
        let branch_path = self.heads_path().join(name);
        if branch_path.exists() {
            return Err(VcsError::BranchExists(name.to_string()));
        }

        self.write_branch_tip(name, oid)
    }

    /// Delete a branch, returning the commit it pointed at.
    pub fn delete_branch(&self, name: &str) -> Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(name);
        if !branch_path.exists() {
            return Err(VcsError::BranchDoesNotExist(name.to_string()));
        }

        let oid = self.read_branch_tip(name)?;
        std::fs::remove_file(&branch_path)?;
        Ok(oid)
    }

    /// Branch names under `refs/heads`, sorted.
    pub fn list_branches(&self) -> Result<Vec<String>> {
        let heads = self.heads_path();
        let mut branches: Vec<String> = WalkDir::new(&heads)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&heads)
                    .ok()
                    .map(|p| p.to_string_lossy().to_string())
            })
            .collect();
        branches.sort();
        Ok(branches)
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| VcsError::InvalidPath(path.display().to_string()))?;
        std::fs::create_dir_all(parent)?;

        let temp_path = path.with_extension("tmp");
        let write = || -> Result<()> {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
            std::fs::rename(&temp_path, path)?;
            Ok(())
        };

        write().inspect_err(|_| {
            let _ = std::fs::remove_file(&temp_path);
        })
    }

    pub fn head_path(&self) -> std::path::PathBuf {
        self.path.join("HEAD")
    }

    pub fn refs_path(&self) -> std::path::PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> std::path::PathBuf {
        self.refs_path().join("heads")
    }

    pub fn tags_path(&self) -> std::path::PathBuf {
        self.refs_path().join("tags")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::hasher;
    use pretty_assertions::assert_eq;

    fn temp_refs() -> (tempfile::TempDir, Refs) {
        let dir = tempfile::tempdir().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        std::fs::create_dir_all(refs.heads_path()).unwrap();
        (dir, refs)
    }

    fn sample_oid() -> ObjectId {
        hasher::hash_bytes(b"commit-ish")
    }

    #[test]
    fn missing_head_is_reported() {
        let (_dir, refs) = temp_refs();
        assert!(matches!(refs.read_head(), Err(VcsError::NoHead)));
    }

    #[test]
    fn attached_head_round_trips() {
        let (_dir, refs) = temp_refs();
        refs.write_head_attached("master").unwrap();

        assert_eq!(
            refs.read_head().unwrap(),
            HeadRef::Attached("master".to_string())
        );
    }

    #[test]
    fn detached_head_parses_as_hash() {
        let (_dir, refs) = temp_refs();
        let oid = sample_oid();
        std::fs::write(refs.head_path(), format!("{oid}\n")).unwrap();

        assert_eq!(refs.read_head().unwrap(), HeadRef::Detached(oid));
    }

    #[test]
    fn garbage_head_is_invalid() {
        let (_dir, refs) = temp_refs();
        std::fs::write(refs.head_path(), "not a ref at all\n").unwrap();

        assert!(matches!(refs.read_head(), Err(VcsError::InvalidHead(_))));
    }

    #[test]
    fn unborn_branch_has_no_tip() {
        let (_dir, refs) = temp_refs();
        refs.write_head_attached("master").unwrap();

        // no ref file at all
        assert_eq!(refs.read_branch_tip("master").unwrap(), None);
        assert_eq!(refs.current_oid().unwrap(), None);

        // empty ref file
        std::fs::write(refs.heads_path().join("master"), "").unwrap();
        assert_eq!(refs.read_branch_tip("master").unwrap(), None);
    }

    #[test]
    fn update_current_advances_the_attached_branch() {
        let (_dir, refs) = temp_refs();
        refs.write_head_attached("master").unwrap();

        let oid = sample_oid();
        refs.update_current(&oid).unwrap();

        assert_eq!(refs.read_branch_tip("master").unwrap(), Some(oid.clone()));
        assert_eq!(refs.current_oid().unwrap(), Some(oid));
        // HEAD itself still points at the branch
        assert_eq!(
            refs.read_head().unwrap(),
            HeadRef::Attached("master".to_string())
        );
    }

    #[test]
    fn branch_creation_is_exclusive() {
        let (_dir, refs) = temp_refs();
        let oid = sample_oid();

        refs.create_branch("feature", &oid).unwrap();
        assert!(matches!(
            refs.create_branch("feature", &oid),
            Err(VcsError::BranchExists(_))
        ));

        assert_eq!(refs.list_branches().unwrap(), vec!["feature".to_string()]);

        assert_eq!(refs.delete_branch("feature").unwrap(), Some(oid));
        assert!(matches!(
            refs.delete_branch("feature"),
            Err(VcsError::BranchDoesNotExist(_))
        ));
    }

    #[test]
    fn no_temp_files_survive_ref_writes() {
        let (_dir, refs) = temp_refs();
        refs.write_branch_tip("master", &sample_oid()).unwrap();

        assert!(!refs.heads_path().join("master.tmp").exists());
    }
}
