use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, Signature};
use crate::artifacts::path_tree::PathTree;
use crate::errors::{Result, VcsError};
use std::io::Write;

impl Repository {
    /// Snapshot the index as a commit and advance the current branch.
    ///
    /// Everything up to the ref update is side-effect-free for the
    /// repository state proper: objects written for an aborted commit are
    /// unreachable and harmless. The index is cleared only after the ref
    /// update succeeds.
    pub fn commit(&mut self, message: &str) -> Result<()> {
        let message = message.trim().to_string();

        let mut index = self.index();
        index.load()?;
        if index.is_empty() {
            return Err(VcsError::NothingToCommit);
        }

        let path_tree = PathTree::from_entries(index.entries())?;
        let tree_oid = path_tree.write_trees(&mut |tree| self.database().store(tree))?;

        let parent = self.refs().current_oid()?;
        let is_root = if parent.is_none() { "(root-commit) " } else { "" };

        let author = Signature::author(&self.vcs_path())?;
        let committer = Signature::committer(&self.vcs_path())?;
        let commit = Commit::new(tree_oid, parent, author, committer, message);

        let commit_oid = self.database().store(&commit)?;
        self.refs().update_current(&commit_oid)?;

        // the commit is complete; empty the staging area
        index.clear();
        index.save()?;

        writeln!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
