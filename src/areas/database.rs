//! Content-addressed object store
//!
//! Objects are identified by the SHA-256 hash of their framed form and live
//! at `.vcs/objects/<first-2-hex-chars>/<remaining-62>`. The stored file is
//! the zlib-compressed frame and nothing else.
//!
//! Writes are write-once: storing an object whose file already exists is a
//! no-op, and new files appear via temp-file + rename so a reader observes
//! either nothing or a complete valid object.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::{Tree, TreeRecord};
use crate::errors::{Result, VcsError};
use flate2::read::ZlibDecoder;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Streaming chunk size for compressed reads.
const READ_BUFFER_SIZE: usize = 16 * 1024;

/// Monotonic counter distinguishing temp files within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Content-addressed object store rooted at `.vcs/objects`.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object, returning its id.
    ///
    /// Computes the identity, and materializes the compressed frame under
    /// the two-character prefix directory unless a file for that id already
    /// exists. Identical content maps to an identical path, so the
    /// collision case needs no comparison.
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let oid = object.object_id()?;
        let object_path = self.path.join(oid.to_path());

        if !object_path.exists() {
            let parent = object_path
                .parent()
                .ok_or_else(|| VcsError::InvalidPath(object_path.display().to_string()))?;
            std::fs::create_dir_all(parent)?;

            let content = object.serialize()?;
            self.write_object(&object_path, &content)?;
            tracing::debug!(oid = %oid, kind = %object.object_type(), "stored object");
        }

        Ok(oid)
    }

    /// Whether an object with this id is present.
    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.path.join(oid.to_path()).exists()
    }

    /// Read and parse an object of any kind.
    pub fn parse_object(&self, oid: &ObjectId) -> Result<ObjectBox> {
        let (object_type, reader) = self.open_object(oid)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(reader)?))),
            ObjectType::Tag => Ok(ObjectBox::Tag(Box::new(Tag::deserialize(reader)?))),
        }
    }

    /// Parse an object as a blob, if it is one.
    pub fn parse_object_as_blob(&self, oid: &ObjectId) -> Result<Option<Blob>> {
        let (object_type, reader) = self.open_object(oid)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a tree, if it is one.
    pub fn parse_object_as_tree(&self, oid: &ObjectId) -> Result<Option<Tree>> {
        let (object_type, reader) = self.open_object(oid)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a commit, if it is one.
    pub fn parse_object_as_commit(&self, oid: &ObjectId) -> Result<Option<Commit>> {
        let (object_type, reader) = self.open_object(oid)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(reader)?)),
            _ => Ok(None),
        }
    }

    /// Root tree id of a commit. Used by the status engine to avoid
    /// re-parsing the whole commit at every call site.
    pub fn read_commit_tree_oid(&self, commit_oid: &ObjectId) -> Result<ObjectId> {
        let commit = self
            .parse_object_as_commit(commit_oid)?
            .ok_or_else(|| VcsError::InvalidObjectType(format!("{commit_oid} is not a commit")))?;
        Ok(commit.tree_oid().clone())
    }

    /// Flatten the tree rooted at `tree_oid` into `out`, mapping each leaf
    /// blob's repository-relative path to its record.
    pub fn read_tree_flat(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        out: &mut BTreeMap<PathBuf, TreeRecord>,
    ) -> Result<()> {
        let tree = self
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| VcsError::InvalidObjectType(format!("{tree_oid} is not a tree")))?;

        for (name, record) in tree.entries() {
            let path = prefix.join(name);
            if record.mode.is_tree() {
                self.read_tree_flat(&record.oid, &path, out)?;
            } else {
                out.insert(path, record.clone());
            }
        }

        Ok(())
    }

    /// Open an object for streaming reads, returning its kind and a reader
    /// positioned at the start of the payload.
    pub fn open_object(&self, oid: &ObjectId) -> Result<(ObjectType, ObjectReader)> {
        let object_path = self.path.join(oid.to_path());
        let mut reader = ObjectReader::open(&object_path)?;
        let (object_type, _size) = ObjectType::parse_header(&mut reader)?;

        Ok((object_type, reader))
    }

    fn write_object(&self, object_path: &Path, content: &[u8]) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| VcsError::InvalidPath(object_path.display().to_string()))?;
        let temp_path = object_dir.join(Self::temp_name());

        let compressed = Self::compress(content)?;

        let write = || -> Result<()> {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)?;
            file.write_all(&compressed)?;
            // rename makes the object visible atomically
            std::fs::rename(&temp_path, object_path)?;
            Ok(())
        };

        write().inspect_err(|_| {
            let _ = std::fs::remove_file(&temp_path);
        })
    }

    pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .map_err(|err| VcsError::Compression(err.to_string()))?;

        encoder
            .finish()
            .map_err(|err| VcsError::Compression(err.to_string()))
    }

    fn temp_name() -> String {
        format!(
            "tmp-obj-{}-{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        )
    }
}

/// Cursor-style reader over a compressed object file.
///
/// Decompresses on the fly in fixed-size chunks; the file is never
/// materialized in memory whole. Consumers drive it through the `BufRead`
/// surface: delimiter scans (`read_until` on space/NUL while parsing frames
/// and tree records) and `read_exact` for raw hash bytes. Not shareable
/// across threads without external locking.
pub struct ObjectReader {
    inner: BufReader<ZlibDecoder<BufReader<std::fs::File>>>,
}

impl ObjectReader {
    fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => VcsError::FileDoesNotExist(path.to_path_buf()),
            _ => VcsError::Io(err),
        })?;

        let decoder = ZlibDecoder::new(BufReader::with_capacity(READ_BUFFER_SIZE, file));
        Ok(ObjectReader {
            inner: BufReader::with_capacity(READ_BUFFER_SIZE, decoder),
        })
    }
}

impl Read for ObjectReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for ObjectReader {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}
