use crate::areas::refs::HeadRef;
use crate::areas::repository::Repository;
use crate::errors::{Result, VcsError};
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Create a branch at the current commit.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        let oid = self
            .refs()
            .current_oid()?
            .ok_or(VcsError::NothingToLog)?;

        self.refs().create_branch(name, &oid)?;
        writeln!(self.writer(), "Created branch {name} at {}", oid.to_short_oid())?;

        Ok(())
    }

    /// List branches, marking the current one.
    pub fn list_branches(&self) -> Result<()> {
        let current = match self.refs().read_head()? {
            HeadRef::Attached(name) => Some(name),
            HeadRef::Detached(_) => None,
        };

        for branch in self.refs().list_branches()? {
            if Some(&branch) == current.as_ref() {
                writeln!(self.writer(), "{}", format!("* {branch}").green())?;
            } else {
                writeln!(self.writer(), "  {branch}")?;
            }
        }

        Ok(())
    }

    /// Delete a branch. The current branch cannot be deleted.
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        if let HeadRef::Attached(current) = self.refs().read_head()?
            && current == name
        {
            return Err(VcsError::InvalidHead(format!(
                "cannot delete the current branch {name}"
            )));
        }

        let oid = self.refs().delete_branch(name)?;
        match oid {
            Some(oid) => writeln!(
                self.writer(),
                "Deleted branch {name} (was {})",
                oid.to_short_oid()
            )?,
            None => writeln!(self.writer(), "Deleted branch {name}")?,
        }

        Ok(())
    }
}
