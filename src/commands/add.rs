use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use crate::errors::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

impl Repository {
    /// Stage files: hash each regular file under the given paths, store its
    /// blob, and upsert an index entry with the current stat metadata.
    ///
    /// Per-path failures are logged and the remaining paths proceed;
    /// structural failures abort. When every named path failed and nothing
    /// was staged, the first error is returned so a lone bad path is not
    /// silently swallowed. Tracked files that vanished from the named paths
    /// are removed from the index. The index is persisted once at the end.
    pub fn add(&mut self, paths: &[String]) -> Result<()> {
        let ignores = self.load_ignores()?;
        let mut index = self.index();
        index.load()?;

        let mut staged = 0usize;
        let mut first_error = None;

        for path in paths {
            let rel = Path::new(path);
            let files = match self.workspace().list_files(Some(rel), &ignores) {
                Ok(files) => files,
                Err(err) => {
                    tracing::warn!(path = %path, error = %err, "skipping path");
                    // drop stale tracked entries beneath a vanished path
                    index.remove(rel);
                    first_error.get_or_insert(err);
                    continue;
                }
            };

            let workspace_files: HashSet<&PathBuf> = files.iter().collect();

            for file in &files {
                match self.stage_file(&mut index, file) {
                    Ok(()) => staged += 1,
                    Err(err) if err.is_structural() => return Err(err),
                    Err(err) => {
                        tracing::warn!(path = %file.display(), error = %err, "failed to stage file");
                        first_error.get_or_insert(err);
                    }
                }
            }

            // tracked files under this path that no longer exist on disk
            for tracked in index.entries_under_path(rel) {
                if !workspace_files.contains(&tracked) {
                    index.remove(&tracked);
                }
            }
        }

        index.save()?;

        match first_error {
            Some(err) if staged == 0 => Err(err),
            _ => Ok(()),
        }
    }

    fn stage_file(&self, index: &mut Index, rel: &Path) -> Result<()> {
        let data = self.workspace().read_file(rel)?;
        let stat = self.workspace().stat_file(rel)?;

        let blob = Blob::new(data);
        let oid = self.database().store(&blob)?;

        index.add(IndexEntry::new(rel.to_path_buf(), oid, stat));
        Ok(())
    }
}
