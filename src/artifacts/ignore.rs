//! `.myignore` pattern list
//!
//! One glob per line; `#` starts a comment; blank lines are skipped and
//! surrounding whitespace is trimmed. A trailing `/` marks a directory
//! pattern. Matching uses pathname semantics (`*` does not cross `/`) plus
//! leading-directory semantics: a pattern that matches any ancestor
//! directory of a path ignores the path too.
//!
//! The list is loaded once per operation and passed explicitly into the
//! workspace walker; there is no global ignore state. `.myignore` itself is
//! never ignored.

use crate::errors::{Result, VcsError};
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

/// File name of the ignore list at the repository root.
pub const IGNORE_FILE: &str = ".myignore";

#[derive(Debug)]
struct IgnorePattern {
    matcher: GlobMatcher,
    /// Trailing-slash patterns only match directories
    dir_only: bool,
}

/// Compiled ignore patterns for one repository.
#[derive(Debug, Default)]
pub struct IgnoreList {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreList {
    /// Load the ignore list from the repository root. An absent file yields
    /// an empty list.
    pub fn load(root: &Path) -> Result<Self> {
        let ignore_path = root.join(IGNORE_FILE);
        if !ignore_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&ignore_path)?;
        Self::parse(&content)
    }

    /// Parse ignore patterns from file content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut patterns = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (pattern, dir_only) = match line.strip_suffix('/') {
                Some(stripped) => (stripped, true),
                None => (line, false),
            };

            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|err| VcsError::InvalidPath(format!("bad ignore pattern: {err}")))?;
            patterns.push(IgnorePattern {
                matcher: glob.compile_matcher(),
                dir_only,
            });
        }

        Ok(IgnoreList { patterns })
    }

    /// Whether a repository-relative path is ignored.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        if path == Path::new(IGNORE_FILE) {
            return false;
        }

        for pattern in &self.patterns {
            if pattern.matcher.is_match(path) && (is_dir || !pattern.dir_only) {
                return true;
            }

            // leading-directory semantics: match any ancestor
            let mut ancestor = path.parent();
            while let Some(dir) = ancestor {
                if !dir.as_os_str().is_empty() && pattern.matcher.is_match(dir) {
                    return true;
                }
                ancestor = dir.parent();
            }
        }

        false
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(content: &str) -> IgnoreList {
        IgnoreList::parse(content).unwrap()
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let ignores = list("# build output\n\n  \ntarget/\n");
        assert!(ignores.is_ignored(Path::new("target"), true));
        assert!(!ignores.is_ignored(Path::new("# build output"), false));
    }

    #[test]
    fn plain_globs_match_by_pathname() {
        let ignores = list("*.log\n");
        assert!(ignores.is_ignored(Path::new("debug.log"), false));
        // pathname semantics: * does not cross a separator
        assert!(!ignores.is_ignored(Path::new("sub/debug.log"), false));
    }

    #[test]
    fn directory_patterns_only_match_directories() {
        let ignores = list("build/\n");
        assert!(ignores.is_ignored(Path::new("build"), true));
        assert!(!ignores.is_ignored(Path::new("build"), false));
    }

    #[test]
    fn leading_directory_match_ignores_contents() {
        let ignores = list("build/\n");
        assert!(ignores.is_ignored(Path::new("build/out.o"), false));
        assert!(ignores.is_ignored(Path::new("build/deep/nested.o"), false));
    }

    #[test]
    fn the_ignore_file_itself_is_never_ignored() {
        let ignores = list(".*\n");
        assert!(!ignores.is_ignored(Path::new(".myignore"), false));
        assert!(ignores.is_ignored(Path::new(".cache"), false));
    }

    #[test]
    fn absent_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ignores = IgnoreList::load(dir.path()).unwrap();
        assert!(ignores.is_empty());
        assert!(!ignores.is_ignored(Path::new("anything"), false));
    }
}
