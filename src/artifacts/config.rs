//! Identity configuration
//!
//! Author and committer identities resolve in three steps: environment
//! variables (`VCS_AUTHOR_NAME`, `VCS_AUTHOR_EMAIL`, `VCS_COMMITTER_NAME`,
//! `VCS_COMMITTER_EMAIL`), then the repository config file (flat `key=value`
//! lines under `.vcs/config`), then hardcoded defaults.

use crate::errors::Result;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_NAME: &str = "Unknown Author";
pub const DEFAULT_EMAIL: &str = "unknown@localhost";

/// Config file name under the repository metadata directory.
pub const CONFIG_FILE: &str = "config";

/// A resolved name/email pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Resolve the author identity for a repository rooted at `vcs_dir`.
pub fn author_identity(vcs_dir: &Path) -> Result<Identity> {
    resolve(vcs_dir, "VCS_AUTHOR_NAME", "VCS_AUTHOR_EMAIL", "author.name", "author.email")
}

/// Resolve the committer identity, falling back to the author settings when
/// no committer-specific ones exist.
pub fn committer_identity(vcs_dir: &Path) -> Result<Identity> {
    let author = author_identity(vcs_dir)?;
    let config = read_config(&vcs_dir.join(CONFIG_FILE))?;

    let name = std::env::var("VCS_COMMITTER_NAME")
        .ok()
        .or_else(|| config.get("committer.name").cloned())
        .unwrap_or(author.name);
    let email = std::env::var("VCS_COMMITTER_EMAIL")
        .ok()
        .or_else(|| config.get("committer.email").cloned())
        .unwrap_or(author.email);

    Ok(Identity { name, email })
}

fn resolve(
    vcs_dir: &Path,
    name_var: &str,
    email_var: &str,
    name_key: &str,
    email_key: &str,
) -> Result<Identity> {
    let config = read_config(&vcs_dir.join(CONFIG_FILE))?;

    let name = std::env::var(name_var)
        .ok()
        .or_else(|| config.get(name_key).cloned())
        .unwrap_or_else(|| DEFAULT_NAME.to_string());
    let email = std::env::var(email_var)
        .ok()
        .or_else(|| config.get(email_key).cloned())
        .unwrap_or_else(|| DEFAULT_EMAIL.to_string());

    Ok(Identity { name, email })
}

/// Parse a flat `key=value` config file. Absent file means empty config.
/// `#` starts a comment; blank lines and lines without `=` are skipped.
pub fn read_config(path: &Path) -> Result<BTreeMap<String, String>> {
    let mut config = BTreeMap::new();

    if !path.exists() {
        return Ok(config);
    }

    let content = std::fs::read_to_string(path)?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            config.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    Ok(config)
}
