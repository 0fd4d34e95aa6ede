//! SHA-256 hashing
//!
//! Object identity is the SHA-256 digest of the framed form
//! `<kind> <size>\0<payload>`. The digest never depends on the compressed
//! representation, file metadata, or storage path.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, VcsError};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Largest file the engine will hash or stage (2 GiB).
pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Streaming chunk size for file hashing.
const CHUNK_SIZE: usize = 8 * 1024;

/// Hash a raw byte buffer.
pub fn hash_bytes(data: &[u8]) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(data);
    finalize(hasher)
}

/// Hash a framed object payload: `"<kind> <size>\0" || payload`.
///
/// This is the identity used for store lookup.
pub fn hash_object(kind: ObjectType, payload: &[u8]) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(format!("{} {}\0", kind.as_str(), payload.len()).as_bytes());
    hasher.update(payload);
    finalize(hasher)
}

/// Streaming blob identity of a file on disk.
///
/// Hashes `"blob <size>\0" || contents` in fixed-size chunks so the file is
/// never held in memory whole. The result equals the id the object store
/// would assign to a blob of the same contents, so it can be compared
/// against index entries directly.
pub fn hash_file(path: &Path) -> Result<ObjectId> {
    let size = check_file_size(path)?;

    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    hasher.update(format!("{} {}\0", ObjectType::Blob.as_str(), size).as_bytes());

    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(finalize(hasher))
}

/// Stat a file and reject it when it exceeds [`MAX_FILE_SIZE`].
pub fn check_file_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => VcsError::FileDoesNotExist(path.to_path_buf()),
        _ => VcsError::Io(err),
    })?;

    let size = metadata.len();
    if size > MAX_FILE_SIZE {
        return Err(VcsError::FileTooLarge {
            path: path.to_path_buf(),
            size,
        });
    }

    Ok(size)
}

fn finalize(hasher: Sha256) -> ObjectId {
    let digest = hasher.finalize();
    ObjectId::from_raw(&digest.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn hash_bytes_is_deterministic() {
        assert_eq!(hash_bytes(b"hello\n"), hash_bytes(b"hello\n"));
        assert_ne!(hash_bytes(b"hello\n"), hash_bytes(b"hello"));
    }

    #[test]
    fn hash_object_frames_the_payload() {
        // identity of the frame, not the bare payload
        let framed = hash_object(ObjectType::Blob, b"hello\n");
        assert_eq!(framed, hash_bytes(b"blob 6\0hello\n"));
        assert_ne!(framed, hash_bytes(b"hello\n"));
    }

    #[test]
    fn hash_file_matches_blob_identity() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello\n").unwrap();

        let from_file = hash_file(file.path()).unwrap();
        assert_eq!(from_file, hash_object(ObjectType::Blob, b"hello\n"));
    }

    #[test]
    fn hash_file_reports_missing_files() {
        let err = hash_file(Path::new("/nonexistent/void.txt")).unwrap_err();
        assert!(matches!(err, VcsError::FileDoesNotExist(_)));
    }

    #[test]
    fn oversized_files_are_rejected_before_reading() {
        // a sparse file larger than the limit; no data is materialized
        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_FILE_SIZE + 1).unwrap();

        let err = hash_file(file.path()).unwrap_err();
        assert!(matches!(err, VcsError::FileTooLarge { .. }));
    }
}
