//! Object identifier (SHA-256 hash)
//!
//! Object ids are 64-character lowercase hexadecimal strings. Tree records
//! and index entries store the compact raw 32-byte form; everything
//! user-facing uses hex.
//!
//! Objects live at `.vcs/objects/<first-2-chars>/<remaining-62-chars>`.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_RAW_LENGTH};
use crate::errors::{Result, VcsError};
use std::io;
use std::path::PathBuf;

/// A validated 64-character hexadecimal SHA-256 object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string.
    pub fn try_parse(id: String) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(VcsError::InvalidHash(id));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VcsError::InvalidHash(id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Build an object id from a raw 32-byte digest.
    pub fn from_raw(raw: &[u8; OBJECT_ID_RAW_LENGTH]) -> Self {
        Self(hex::encode(raw))
    }

    /// Write the raw 32-byte form, as stored in tree records and index
    /// entries.
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let raw = hex::decode(&self.0).map_err(|_| VcsError::InvalidHash(self.0.clone()))?;
        writer.write_all(&raw)?;
        Ok(())
    }

    /// Read an object id from its raw 32-byte form.
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; OBJECT_ID_RAW_LENGTH];
        reader.read_exact(&mut raw)?;
        Ok(Self::from_raw(&raw))
    }

    /// Relative storage path `xx/yyyy…` under the objects directory.
    ///
    /// The two-character prefix spreads objects over 256 directories.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Abbreviated form for display.
    pub fn to_short_oid(&self) -> &str {
        &self.0[..7]
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
