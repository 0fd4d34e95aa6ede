//! Typed errors for the storage engine
//!
//! Every core operation returns a `VcsError`. The CLI layer renders the
//! display form as `Error: <message>` on stderr and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, VcsError>;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file does not exist: {0}")]
    FileDoesNotExist(PathBuf),

    #[error("file too large: {path} is {size} bytes")]
    FileTooLarge { path: PathBuf, size: u64 },

    #[error("invalid object id: {0}")]
    InvalidHash(String),

    #[error("invalid object type: {0}")]
    InvalidObjectType(String),

    #[error("corrupt object stream: {0}")]
    StreamCorrupt(String),

    #[error("compression failed: {0}")]
    Compression(String),

    #[error("invalid index header: {0}")]
    IndexHeader(String),

    #[error("invalid index entry: {0}")]
    IndexEntry(String),

    #[error("invalid path component in {0:?}")]
    InvalidPath(String),

    #[error("no HEAD reference found; not a repository?")]
    NoHead,

    #[error("invalid HEAD reference: {0}")]
    InvalidHead(String),

    #[error("branch {0} already exists")]
    BranchExists(String),

    #[error("branch {0} does not exist")]
    BranchDoesNotExist(String),

    #[error("repository already initialized")]
    AlreadyInitialized,

    #[error("nothing to commit, index is empty")]
    NothingToCommit,

    #[error("no commits yet")]
    NothingToLog,
}

impl VcsError {
    /// True for failures that must abort a whole flow instead of being
    /// logged and skipped (see the partial-success policy in `add`).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            VcsError::IndexHeader(_) | VcsError::IndexEntry(_) | VcsError::NoHead
        )
    }
}
