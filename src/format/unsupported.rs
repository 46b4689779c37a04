use std::io::{Read, Write};

use serde_json::Value;

use crate::error::{CodecError, Direction};
use crate::format::Format;

/// The format of a mime type nothing is registered for. Every use fails with
/// [`CodecError::Unsupported`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unsupported {
    mime: Option<String>,
}

impl Unsupported {
    /// Creates the sentinel for `mime`, `None` when no mime type was given.
    /// The text is kept as given; a blank one counts as no mime type in
    /// errors.
    pub fn new(mime: Option<String>) -> Unsupported {
        Unsupported { mime }
    }

    fn error(&self, direction: Direction) -> CodecError {
        let mime = self.mime.as_deref()
            .map(str::trim)
            .filter(|mime| !mime.is_empty())
            .map(String::from);

        CodecError::Unsupported { direction, mime }
    }
}

impl Format for Unsupported {
    fn mime_type(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn serialize(&self, _: &Value, _: &mut dyn Write) -> Result<(), CodecError> {
        Err(self.error(Direction::Serialize))
    }

    fn deserialize(&self, _: &mut dyn Read) -> Result<Value, CodecError> {
        Err(self.error(Direction::Deserialize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fails_on_use() {
        let format = Unsupported::new(Some("text/xml".into()));
        let mut out: Vec<u8> = Vec::new();

        let err = format.serialize(&Value::Null, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "cannot serialize to text/xml");
        assert!(out.is_empty());

        let err = format.deserialize(&mut &b"<xml/>"[..]).unwrap_err();
        assert_eq!(err.to_string(), "cannot deserialize from text/xml");
    }

    #[test]
    fn without_mime_type() {
        let err = Unsupported::new(None).serialize(&Value::Null, &mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err.to_string(), "cannot serialize without mime type");

        let err = Unsupported::new(Some("  ".into())).deserialize(&mut &b""[..]).unwrap_err();
        assert_eq!(err.to_string(), "cannot deserialize without mime type");
    }
}
