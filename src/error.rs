use std::fmt;
use std::io;

use thiserror::Error;

/// A `Set-Cookie` value could not be split into a name and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The cookie did not contain a name/value pair.
    #[error("the cookie is missing a name/value pair")]
    MissingPair,
    /// The cookie's name was empty.
    #[error("the cookie's name is empty")]
    EmptyName,
}

/// A `Link` header did not conform to the RFC 5988 grammar.
///
/// Carries the set of delimiters the parser was expecting at the point of
/// failure and the token it found instead (`None` at end of input).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected [{expected}], have {}", Found(.found.as_deref()))]
pub struct FormatError {
    /// The delimiter characters that would have been accepted.
    pub expected: &'static str,
    /// What was actually read, if anything.
    pub found: Option<String>,
}

impl FormatError {
    pub(crate) fn new(expected: &'static str, found: Option<&str>) -> Self {
        FormatError { expected, found: found.map(String::from) }
    }
}

struct Found<'a>(Option<&'a str>);

impl fmt::Display for Found<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(token) => write!(f, "{:?}", token),
            None => f.write_str("end of input"),
        }
    }
}

/// The direction a [`Format`](crate::format::Format) was used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Writing a value out.
    Serialize,
    /// Reading a value in.
    Deserialize,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Direction::Serialize => f.write_str("serialize to"),
            Direction::Deserialize => f.write_str("deserialize from"),
        }
    }
}

/// Errors raised while encoding or decoding a body.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The content type has no registered format.
    #[error("cannot {}", Describe(.direction, .mime.as_deref()))]
    Unsupported {
        /// What the format was asked to do.
        direction: Direction,
        /// The mime type asked for, `None` when there was none.
        mime: Option<String>,
    },

    /// Invalid JSON, or a value JSON can't represent.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A value that isn't a flat object of scalars.
    #[error("form encoding: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    /// A body that isn't `application/x-www-form-urlencoded`.
    #[error("form decoding: {0}")]
    FormDecode(#[from] serde_urlencoded::de::Error),

    /// Reading or writing the body failed.
    #[error("i/o: {0}")]
    Io(#[from] io::Error),
}

struct Describe<'a>(&'a Direction, Option<&'a str>);

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (*self.0, self.1) {
            (direction, Some(mime)) => write!(f, "{} {}", direction, mime),
            (Direction::Serialize, None) => f.write_str("serialize without mime type"),
            (Direction::Deserialize, None) => f.write_str("deserialize without mime type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_message() {
        let e = FormatError::new(";,", Some("x"));
        assert_eq!(e.to_string(), "expected [;,], have \"x\"");

        let e = FormatError::new(">", None);
        assert_eq!(e.to_string(), "expected [>], have end of input");
    }

    #[test]
    fn unsupported_message() {
        let e = CodecError::Unsupported {
            direction: Direction::Serialize,
            mime: Some("text/xml".into()),
        };
        assert_eq!(e.to_string(), "cannot serialize to text/xml");

        let e = CodecError::Unsupported { direction: Direction::Deserialize, mime: None };
        assert_eq!(e.to_string(), "cannot deserialize without mime type");
    }
}
