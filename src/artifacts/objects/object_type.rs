use crate::errors::{Result, VcsError};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Consume and parse the frame header `<kind> <size>\0` from a reader,
    /// leaving it positioned at the start of the payload.
    pub fn parse_header(reader: &mut impl BufRead) -> Result<(ObjectType, u64)> {
        let mut kind = Vec::new();
        reader.read_until(b' ', &mut kind)?;
        if kind.pop() != Some(b' ') {
            return Err(VcsError::StreamCorrupt("missing space after kind".into()));
        }
        let kind = std::str::from_utf8(&kind)
            .map_err(|_| VcsError::StreamCorrupt("non-utf8 object kind".into()))?;
        let object_type = ObjectType::try_from(kind)?;

        let mut size = Vec::new();
        reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            return Err(VcsError::StreamCorrupt("missing NUL after size".into()));
        }
        let size = std::str::from_utf8(&size)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| VcsError::StreamCorrupt("malformed object size".into()))?;

        Ok((object_type, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = VcsError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            "tag" => Ok(ObjectType::Tag),
            other => Err(VcsError::InvalidObjectType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn parses_frame_headers() {
        let mut reader = Cursor::new(b"blob 6\0hello\n".to_vec());
        let (kind, size) = ObjectType::parse_header(&mut reader).unwrap();
        assert_eq!(kind, ObjectType::Blob);
        assert_eq!(size, 6);
    }

    #[test]
    fn rejects_unknown_kind() {
        let mut reader = Cursor::new(b"branch 3\0abc".to_vec());
        assert!(matches!(
            ObjectType::parse_header(&mut reader),
            Err(VcsError::InvalidObjectType(_))
        ));
    }

    #[test]
    fn rejects_malformed_framing() {
        let mut reader = Cursor::new(b"blob6\0hi".to_vec());
        assert!(ObjectType::parse_header(&mut reader).is_err());

        let mut reader = Cursor::new(b"blob abc\0hi".to_vec());
        assert!(matches!(
            ObjectType::parse_header(&mut reader),
            Err(VcsError::StreamCorrupt(_))
        ));
    }
}
