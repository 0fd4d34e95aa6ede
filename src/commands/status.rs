use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{ChangeSet, Status, StatusReport};
use crate::errors::Result;
use colored::Colorize;
use std::io::Write;

// Terminology:
// - untracked: present in the working tree, unknown to the index
// - workspace changes: index entries whose working-tree file differs
// - index changes: index entries that differ from the HEAD commit's tree
impl Repository {
    pub fn display_status(&mut self, porcelain: bool) -> Result<()> {
        let ignores = self.load_ignores()?;

        let mut index = self.index();
        index.load()?;
        let report = Status::new(self, &ignores).collect(&mut index)?;
        // persist any stat refreshes picked up during the scan
        index.save()?;
        drop(index);

        if porcelain {
            for (file, change) in &report.changed_files {
                writeln!(self.writer(), "{} {}", change, file.display())?;
            }
            for file in &report.untracked_files {
                writeln!(self.writer(), "?? {}", file.display())?;
            }
        } else {
            self.print_changes("Changes to be committed", &report.index_changeset)?;
            self.print_changes("Changes not staged for commit", &report.workspace_changeset)?;
            self.print_changes("Untracked files", &report.untracked_changeset)?;
            self.print_summary(&report)?;
        }

        Ok(())
    }

    fn print_changes(&self, heading: &str, changeset: &ChangeSet) -> Result<()> {
        if changeset.is_empty() {
            return Ok(());
        }

        writeln!(self.writer(), "{}:\n", heading.bold())?;
        for (file, change) in changeset {
            writeln!(
                self.writer(),
                "{}{}",
                change,
                file.display().to_string().cyan()
            )?;
        }
        writeln!(self.writer())?;

        Ok(())
    }

    fn print_summary(&self, report: &StatusReport) -> Result<()> {
        if !report.index_changeset.is_empty() {
            return Ok(());
        }

        if !report.workspace_changeset.is_empty() {
            writeln!(self.writer(), "{}", "no changes added to commit".yellow())?;
        } else if !report.untracked_changeset.is_empty() {
            writeln!(
                self.writer(),
                "{}",
                "no changes added to commit but untracked files present".yellow()
            )?;
        } else {
            writeln!(
                self.writer(),
                "{}",
                "nothing to commit, working tree clean".green()
            )?;
        }

        Ok(())
    }
}
