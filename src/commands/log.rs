use crate::areas::repository::Repository;
use crate::errors::{Result, VcsError};
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Walk the first-parent chain from HEAD and print each commit.
    pub fn log(&self, oneline: bool) -> Result<()> {
        let mut cursor = self.refs().current_oid()?;
        if cursor.is_none() {
            return Err(VcsError::NothingToLog);
        }

        while let Some(oid) = cursor {
            let commit = self
                .database()
                .parse_object_as_commit(&oid)?
                .ok_or_else(|| VcsError::InvalidObjectType(format!("{oid} is not a commit")))?;

            if oneline {
                writeln!(
                    self.writer(),
                    "{} {}",
                    oid.to_short_oid().yellow(),
                    commit.short_message()
                )?;
            } else {
                writeln!(self.writer(), "{}", format!("commit {oid}").yellow())?;
                writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
                writeln!(self.writer(), "Date:   {}", commit.author().readable_timestamp())?;
                writeln!(self.writer())?;
                for line in commit.message().lines() {
                    writeln!(self.writer(), "    {line}")?;
                }
                writeln!(self.writer())?;
            }

            cursor = commit.parent().cloned();
        }

        Ok(())
    }
}
