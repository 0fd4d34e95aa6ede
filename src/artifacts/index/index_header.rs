use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::errors::{Result, VcsError};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::{Read, Write};

/// Twelve-byte index file header: magic, version, entry count.
///
/// The entry count is authoritative; readers consume exactly that many
/// entries after the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHeader {
    pub signature: [u8; 4],
    pub version: u32,
    pub entry_count: u32,
}

impl IndexHeader {
    pub fn empty() -> Self {
        IndexHeader {
            signature: *SIGNATURE,
            version: VERSION,
            entry_count: 0,
        }
    }

    pub fn with_entry_count(entry_count: u32) -> Self {
        IndexHeader {
            entry_count,
            ..Self::empty()
        }
    }

    pub fn serialize(&self) -> Result<Bytes> {
        let mut header_bytes = Vec::with_capacity(HEADER_SIZE);
        header_bytes.write_all(&self.signature)?;
        header_bytes.write_u32::<LittleEndian>(self.version)?;
        header_bytes.write_u32::<LittleEndian>(self.entry_count)?;

        Ok(Bytes::from(header_bytes))
    }

    /// Parse and validate a header from a reader.
    pub fn deserialize(mut reader: impl Read) -> Result<Self> {
        let mut signature = [0u8; 4];
        reader
            .read_exact(&mut signature)
            .map_err(|_| VcsError::IndexHeader("truncated header".into()))?;
        if &signature != SIGNATURE {
            return Err(VcsError::IndexHeader(format!(
                "bad signature {:?}",
                String::from_utf8_lossy(&signature)
            )));
        }

        let version = reader
            .read_u32::<LittleEndian>()
            .map_err(|_| VcsError::IndexHeader("truncated header".into()))?;
        if version != VERSION {
            return Err(VcsError::IndexHeader(format!(
                "unsupported version {version}"
            )));
        }

        let entry_count = reader
            .read_u32::<LittleEndian>()
            .map_err(|_| VcsError::IndexHeader("truncated header".into()))?;

        Ok(IndexHeader {
            signature,
            version,
            entry_count,
        })
    }
}
