//! Staging index file format
//!
//! The index tracks the files that will make up the next commit. On-disk
//! layout (all integers little-endian):
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version:   2      (u32)
//!   - Entry count       (u32)
//!
//! Entries (variable length, sorted by path):
//!   - ten u32 stat fields, 32 raw hash bytes, u16 flags,
//!     NUL-terminated path, NUL padding to an 8-byte boundary
//! ```

pub mod entry_mode;
pub mod index_entry;
pub mod index_header;

/// Size of the index header in bytes
pub const HEADER_SIZE: usize = 12;

/// Magic signature identifying index files
pub const SIGNATURE: &[u8; 4] = b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;
