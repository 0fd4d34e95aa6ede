use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use crate::errors::{Result, VcsError};
use std::fs;
use std::io::Write;

impl Repository {
    /// Create the on-disk layout: `.vcs/{objects, refs/heads, refs/tags}`,
    /// HEAD attached to the default branch, an unborn default branch, and
    /// an empty index.
    pub fn init(&mut self) -> Result<()> {
        if self.vcs_path().exists() {
            return Err(VcsError::AlreadyInitialized);
        }

        fs::create_dir_all(self.database().objects_path())?;
        fs::create_dir_all(self.refs().heads_path())?;
        fs::create_dir_all(self.refs().tags_path())?;

        self.refs().write_head_attached(DEFAULT_BRANCH)?;

        // the default branch exists from the start, with no commits yet
        let default_branch_path = self.refs().heads_path().join(DEFAULT_BRANCH);
        if !default_branch_path.exists() {
            fs::write(&default_branch_path, b"")?;
        }

        let index_path = self.index().path().to_path_buf();
        if !index_path.exists() {
            fs::write(&index_path, b"")?;
        }

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
