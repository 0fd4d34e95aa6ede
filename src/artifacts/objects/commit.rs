//! Commit object
//!
//! A commit names a root tree, an optional parent commit, author and
//! committer signatures, and a message. On disk:
//!
//! ```text
//! commit <size>\0tree <hex-hash>
//! parent <hex-hash>          (omitted when there is no parent)
//! author <name> <email> <unix-seconds> <tz-offset>
//! committer <name> <email> <unix-seconds> <tz-offset>
//!
//! <message>
//! ```

use crate::artifacts::config::{self, Identity};
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, VcsError};
use bytes::Bytes;
use std::io::{BufRead, Write};
use std::path::Path;

/// Author or committer signature: name, email, timestamp with offset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signature {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Signature {
    pub fn new(name: String, email: String) -> Self {
        Signature {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Signature {
            name,
            email,
            timestamp,
        }
    }

    /// Resolve the author signature for a repository.
    ///
    /// `VCS_AUTHOR_DATE` (`%Y-%m-%d %H:%M:%S %z` or RFC 2822) pins the
    /// timestamp; without it the current local time is used.
    pub fn author(vcs_dir: &Path) -> Result<Self> {
        let Identity { name, email } = config::author_identity(vcs_dir)?;
        Ok(Self::with_env_date(name, email))
    }

    /// Resolve the committer signature for a repository.
    pub fn committer(vcs_dir: &Path) -> Result<Self> {
        let Identity { name, email } = config::committer_identity(vcs_dir)?;
        Ok(Self::with_env_date(name, email))
    }

    fn with_env_date(name: String, email: String) -> Self {
        let timestamp = std::env::var("VCS_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z")
                .or_else(|_| chrono::DateTime::parse_from_rfc2822(&date_str))
                .ok()
        });

        match timestamp {
            Some(ts) => Self::new_with_timestamp(name, email, ts),
            None => Self::new(name, email),
        }
    }

    /// Wire form: `name <email> <unix-seconds> <±HHMM>`.
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Human form: `name <email>`.
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Signature {
    type Error = VcsError;

    // Format: "name <email> timestamp timezone"; split from the right so
    // names may contain spaces.
    fn try_from(value: &str) -> Result<Self> {
        let malformed = || VcsError::StreamCorrupt(format!("malformed signature: {value}"));

        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(malformed());
        }

        let timezone = parts[0];
        let seconds = parts[1].parse::<i64>().map_err(|_| malformed())?;
        let name_email = parts[2];

        let email_start = name_email.find('<').ok_or_else(malformed)?;
        let email_end = name_email.rfind('>').ok_or_else(malformed)?;
        if email_end < email_start {
            return Err(malformed());
        }

        let name = name_email[..email_start].trim().to_string();
        let email = name_email[email_start + 1..email_end].to_string();

        let utc = chrono::DateTime::from_timestamp(seconds, 0).ok_or_else(malformed)?;
        let offset = parse_tz_offset(timezone).ok_or_else(malformed)?;

        Ok(Signature {
            name,
            email,
            timestamp: utc.with_timezone(&offset),
        })
    }
}

fn parse_tz_offset(tz: &str) -> Option<chrono::FixedOffset> {
    let (sign, digits) = tz.split_at_checked(1)?;
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    let seconds = (hours * 60 + minutes) * 60;

    match sign {
        "+" => chrono::FixedOffset::east_opt(seconds),
        "-" => chrono::FixedOffset::west_opt(seconds),
        _ => None,
    }
}

/// Commit object: a snapshot with metadata.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    tree_oid: ObjectId,
    parent: Option<ObjectId>,
    author: Signature,
    committer: Signature,
    message: String,
}

impl Commit {
    pub fn new(
        tree_oid: ObjectId,
        parent: Option<ObjectId>,
        author: Signature,
        committer: Signature,
        message: String,
    ) -> Self {
        Commit {
            tree_oid,
            parent,
            author,
            committer,
            message,
        }
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Signature {
        &self.author
    }

    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, for one-line display.
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.clone());

        let content = lines.join("\n");

        let mut commit_bytes = Vec::with_capacity(content.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), content.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(content.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let missing = |what: &str| VcsError::StreamCorrupt(format!("commit missing {what} line"));

        let mut lines = content.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| missing("tree"))?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut next_line = lines.next().ok_or_else(|| missing("author"))?;

        let parent = match next_line.strip_prefix("parent ") {
            Some(parent_oid) => {
                next_line = lines.next().ok_or_else(|| missing("author"))?;
                Some(ObjectId::try_parse(parent_oid.to_string())?)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .ok_or_else(|| missing("author"))?;
        let author = Signature::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .ok_or_else(|| missing("committer"))?;
        let committer = Signature::try_from(committer)?;

        // skip the separator between headers and message
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(tree_oid, parent, author, committer, message))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
