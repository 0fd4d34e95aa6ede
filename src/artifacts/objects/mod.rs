//! Object types and their wire formats
//!
//! Every piece of repository content is an object identified by the SHA-256
//! hash of its framed form `<kind> <size>\0<payload>`. There are four kinds:
//!
//! - **Blob**: raw file bytes
//! - **Tree**: one directory level (names, modes, child object ids)
//! - **Commit**: a snapshot with metadata (tree, parent, signatures, message)
//! - **Tag**: a named reference to another object
//!
//! Objects are stored zlib-compressed under `.vcs/objects/`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tag;
pub mod tree;

/// Length of a SHA-256 hash in hexadecimal form
pub const OBJECT_ID_LENGTH: usize = 64;

/// Length of a SHA-256 hash in raw bytes
pub const OBJECT_ID_RAW_LENGTH: usize = 32;
