//! Repository coordination
//!
//! `Repository` is the facade over the database, index, workspace, and
//! refs. The porcelain commands (`init`, `add`, `commit`, `status`, `log`,
//! `branch`) are implemented as `impl Repository` blocks under
//! `crate::commands`.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::ignore::IgnoreList;
use crate::errors::{Result, VcsError};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Repository metadata directory name
pub const VCS_DIR: &str = ".vcs";

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

/// Coordinates all repository operations.
///
/// Single-process and single-threaded by design: the index lives in a
/// `RefCell` and every operation runs to completion before the next one
/// starts.
pub struct Repository {
    /// Repository root (the working tree)
    path: Box<Path>,
    /// Output sink for human-readable command output
    writer: RefCell<Box<dyn std::io::Write>>,
    /// Staging area
    index: RefCell<Index>,
    /// Object database
    database: Database,
    /// Working directory
    workspace: Workspace,
    /// Reference manager
    refs: Refs,
}

impl Repository {
    /// Construct a repository handle without verifying the on-disk layout.
    /// Used by `init`; every other command goes through [`Repository::open`].
    pub fn new(path: PathBuf, writer: Box<dyn std::io::Write>) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        let path = path.canonicalize()?;

        let vcs_path = path.join(VCS_DIR);
        let index = Index::new(vcs_path.join(INDEX_FILE).into_boxed_path());
        let database = Database::new(vcs_path.join(DATABASE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(vcs_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    /// Open an existing repository: verify the layout, then sweep any
    /// temp files a crashed writer left behind.
    pub fn open(path: PathBuf, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let repository = Self::new(path, writer)?;

        if !repository.vcs_path().exists() || !repository.refs.head_path().exists() {
            return Err(VcsError::NoHead);
        }

        repository.sweep_temp_files();
        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn vcs_path(&self) -> PathBuf {
        self.path.join(VCS_DIR)
    }

    pub fn writer(&self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Load the ignore list fresh from `.myignore`. Loaded per operation
    /// and passed explicitly into the walkers.
    pub fn load_ignores(&self) -> Result<IgnoreList> {
        IgnoreList::load(&self.path)
    }

    /// Unlink stray `*.tmp` files under `.vcs` left by interrupted writes.
    fn sweep_temp_files(&self) {
        let strays = WalkDir::new(self.vcs_path())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy();
                name.ends_with(".tmp") || name.starts_with("tmp-obj-")
            });

        for stray in strays {
            tracing::debug!(path = %stray.path().display(), "removing stray temp file");
            let _ = std::fs::remove_file(stray.path());
        }
    }
}
