//! Core object traits
//!
//! - `Packable`: serialization to the framed binary form
//! - `Unpackable`: deserialization from a reader positioned past the header
//! - `Object`: identity and storage-path computation

use crate::artifacts::hasher;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Result;
use bytes::Bytes;
use std::io::BufRead;
use std::path::PathBuf;

/// Serialization to the framed form `<kind> <size>\0<payload>`.
pub trait Packable {
    /// Serialize the object, header included.
    fn serialize(&self) -> Result<Bytes>;
}

/// Deserialization from a reader whose frame header has been consumed.
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Common object operations.
pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Identity: SHA-256 of the serialized framed form.
    fn object_id(&self) -> Result<ObjectId> {
        Ok(hasher::hash_bytes(&self.serialize()?))
    }

    /// Relative path under the objects directory where this object lives.
    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Parsed object of a kind not known at compile time.
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
    Tag(Box<Tag>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
            ObjectBox::Tag(_) => ObjectType::Tag,
        }
    }
}
