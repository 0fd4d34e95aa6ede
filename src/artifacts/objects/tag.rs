//! Tag object
//!
//! An annotated, named reference to another object. On disk:
//!
//! ```text
//! tag <size>\0object <hex-hash>
//! type <kind>
//! tag <name>
//! tagger <name> <email> <unix-seconds> <tz-offset>
//!
//! <message>
//! ```
//!
//! Tags are readable and writable through the object store; no porcelain
//! command produces them yet.

use crate::artifacts::objects::commit::Signature;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, VcsError};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Tag {
    target: ObjectId,
    target_kind: ObjectType,
    name: String,
    tagger: Signature,
    message: String,
}

impl Tag {
    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    pub fn target_kind(&self) -> ObjectType {
        self.target_kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagger(&self) -> &Signature {
        &self.tagger
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Packable for Tag {
    fn serialize(&self) -> Result<Bytes> {
        let content = [
            format!("object {}", self.target),
            format!("type {}", self.target_kind),
            format!("tag {}", self.name),
            format!("tagger {}", self.tagger.display()),
            String::new(),
            self.message.clone(),
        ]
        .join("\n");

        let mut tag_bytes = Vec::with_capacity(content.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), content.len());
        tag_bytes.write_all(header.as_bytes())?;
        tag_bytes.write_all(content.as_bytes())?;

        Ok(Bytes::from(tag_bytes))
    }
}

impl Unpackable for Tag {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let missing = |what: &str| VcsError::StreamCorrupt(format!("tag missing {what} line"));

        let mut lines = content.lines();

        let target = lines
            .next()
            .and_then(|line| line.strip_prefix("object "))
            .ok_or_else(|| missing("object"))?;
        let target = ObjectId::try_parse(target.to_string())?;

        let target_kind = lines
            .next()
            .and_then(|line| line.strip_prefix("type "))
            .ok_or_else(|| missing("type"))?;
        let target_kind = ObjectType::try_from(target_kind)?;

        let name = lines
            .next()
            .and_then(|line| line.strip_prefix("tag "))
            .ok_or_else(|| missing("tag"))?
            .to_string();

        let tagger = lines
            .next()
            .and_then(|line| line.strip_prefix("tagger "))
            .ok_or_else(|| missing("tagger"))?;
        let tagger = Signature::try_from(tagger)?;

        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(target, target_kind, name, tagger, message))
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }
}
