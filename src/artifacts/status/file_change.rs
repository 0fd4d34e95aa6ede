use colored::Colorize;

const LABEL_WIDTH: usize = 8;

/// Working tree vs index: the unstaged axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorkspaceChangeType {
    #[default]
    None,
    Untracked,
    Modified,
    Deleted,
}

impl From<WorkspaceChangeType> for &'static str {
    fn from(change: WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::None => " ",
            WorkspaceChangeType::Untracked => "??",
            WorkspaceChangeType::Modified => "M",
            WorkspaceChangeType::Deleted => "D",
        }
    }
}

/// Index vs HEAD tree: the staged axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum IndexChangeType {
    #[default]
    None,
    Added,
    Modified,
    Deleted,
}

impl From<IndexChangeType> for &'static str {
    fn from(change: IndexChangeType) -> Self {
        match change {
            IndexChangeType::None => " ",
            IndexChangeType::Added => "A",
            IndexChangeType::Modified => "M",
            IndexChangeType::Deleted => "D",
        }
    }
}

/// A change attributed to one axis, for grouped human output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeType {
    Workspace(WorkspaceChangeType),
    Index(IndexChangeType),
}

impl std::fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileChangeType::Workspace(change) => match change {
                WorkspaceChangeType::None | WorkspaceChangeType::Untracked => "".normal(),
                WorkspaceChangeType::Modified => "modified:   ".red(),
                WorkspaceChangeType::Deleted => "deleted:    ".red(),
            },
            FileChangeType::Index(change) => match change {
                IndexChangeType::None => "".normal(),
                IndexChangeType::Added => "new file:   ".green(),
                IndexChangeType::Modified => "modified:   ".green(),
                IndexChangeType::Deleted => "deleted:    ".green(),
            },
        };
        write!(f, "{:>width$}{}", "", label, width = LABEL_WIDTH)
    }
}

/// The two-axis classification of one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileChange {
    pub workspace_change: WorkspaceChangeType,
    pub index_change: IndexChangeType,
}

impl FileChange {
    pub fn is_clean(&self) -> bool {
        self.workspace_change == WorkspaceChangeType::None
            && self.index_change == IndexChangeType::None
    }
}

impl From<&FileChange> for String {
    fn from(change: &FileChange) -> Self {
        let index_code: &str = change.index_change.into();
        let workspace_code: &str = change.workspace_change.into();
        format!("{index_code}{workspace_code}")
    }
}

impl std::fmt::Display for FileChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code: String = self.into();
        write!(f, "{code}")
    }
}
