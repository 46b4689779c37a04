//! Body formats, looked up by mime type.
//!
//! A [`Formats`] registry maps `Content-Type` header values to a [`Format`]
//! that serializes and deserializes [`serde_json::Value`] documents. Lookups
//! never fail: a mime type without a registered format resolves to
//! [`Unsupported`], which fails only once it is used.
//!
//! ```rust
//! use serde_json::json;
//! use webrest::Formats;
//!
//! let formats = Formats::defaults();
//! let format = formats.named(Some("application/vnd.github.v3+json; charset=utf-8"));
//!
//! let mut body: Vec<u8> = Vec::new();
//! format.serialize(&json!({"key": "value"}), &mut body).unwrap();
//! assert_eq!(body, br#"{"key":"value"}"#);
//!
//! let xml = formats.named(Some("text/xml"));
//! assert!(xml.serialize(&json!({}), &mut Vec::<u8>::new()).is_err());
//! ```

mod form;
mod json;
mod ndjson;
mod pattern;
mod unsupported;

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use serde_json::Value;

use crate::error::CodecError;

pub use self::form::FormUrlencoded;
pub use self::json::Json;
pub use self::ndjson::{NdJson, Values};
pub use self::pattern::MimePattern;
pub use self::unsupported::Unsupported;

/// Well-known mime types.
pub mod mime {
    /// `application/json`
    pub const JSON: &str = "application/json";
    /// `text/xml`
    pub const XML: &str = "text/xml";
    /// `application/x-www-form-urlencoded`
    pub const FORM: &str = "application/x-www-form-urlencoded";
    /// `application/x-ndjson`, newline-delimited JSON.
    pub const NDJSON: &str = "application/x-ndjson";
}

/// A body encoding.
pub trait Format: fmt::Debug + Send + Sync {
    /// The mime type this format produces, if it has one.
    fn mime_type(&self) -> Option<&str>;

    /// Whether this format can be used at all. Only [`Unsupported`] returns
    /// `false`.
    fn is_supported(&self) -> bool {
        true
    }

    /// Writes `value` to `out`.
    fn serialize(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError>;

    /// Reads a value from `input`.
    fn deserialize(&self, input: &mut dyn Read) -> Result<Value, CodecError>;
}

/// A registry of [`Format`]s keyed by exact mime type or by [`MimePattern`].
///
/// # Example
///
/// ```rust
/// use webrest::format::{Formats, Json};
///
/// let formats = Formats::new()
///     .with("application/hal+json", Json::new())
///     .matching("application/vnd.*+xml", Json::pretty());
///
/// assert!(formats.named(Some("application/hal+json")).is_supported());
/// assert!(formats.named(Some("application/vnd.com.example+xml")).is_supported());
/// assert!(!formats.named(Some("application/json")).is_supported());
/// assert!(!formats.named(None).is_supported());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Formats {
    exact: HashMap<String, Arc<dyn Format>>,
    patterns: Vec<(MimePattern, Arc<dyn Format>)>,
}

impl Formats {
    /// Creates an empty registry.
    pub fn new() -> Formats {
        Formats::default()
    }

    /// Creates a registry with the built-in formats: [`Json`] for
    /// `application/json` and `application/vnd.*+json`, [`NdJson`] for
    /// `application/x-ndjson` and [`FormUrlencoded`] for
    /// `application/x-www-form-urlencoded`.
    pub fn defaults() -> Formats {
        let json: Arc<dyn Format> = Arc::new(Json::new());
        Formats::new()
            .with(mime::NDJSON, NdJson::new())
            .with_shared(mime::JSON, json.clone())
            .with(mime::FORM, FormUrlencoded::new())
            .matching_shared("application/vnd.*+json", json)
    }

    /// Registers `format` for the exact mime type `mime`, replacing any
    /// earlier registration.
    pub fn with<F: Format + 'static>(self, mime: &str, format: F) -> Formats {
        self.with_shared(mime, Arc::new(format))
    }

    /// Like [`Formats::with()`], for a format that is already shared.
    pub fn with_shared(mut self, mime: &str, format: Arc<dyn Format>) -> Formats {
        self.exact.insert(normalize(mime), format);
        self
    }

    /// Registers `format` for all mime types matching `pattern`, in which
    /// `*` stands for one or more characters. Patterns are tried in the
    /// order they were registered, after exact matches.
    pub fn matching<F: Format + 'static>(self, pattern: &str, format: F) -> Formats {
        self.matching_shared(pattern, Arc::new(format))
    }

    /// Like [`Formats::matching()`], for a format that is already shared.
    pub fn matching_shared(mut self, pattern: &str, format: Arc<dyn Format>) -> Formats {
        self.patterns.push((MimePattern::new(pattern), format));
        self
    }

    /// Returns the format for a `Content-Type` header value.
    ///
    /// Parameters such as `; charset=utf-8` are ignored, as are surrounding
    /// whitespace and case. Exact registrations win over patterns. If nothing
    /// matches, or `header` is `None` or blank, an [`Unsupported`] format is
    /// returned. It carries the header text before any `;` as it was given.
    pub fn named(&self, header: Option<&str>) -> Arc<dyn Format> {
        let raw = header.map(bare);
        let mime = raw.map(normalize).unwrap_or_default();
        if !mime.is_empty() {
            if let Some(format) = self.exact.get(&mime) {
                return format.clone();
            }

            if let Some((_, format)) = self.patterns.iter().find(|(pattern, _)| pattern.matches(&mime)) {
                return format.clone();
            }
        }

        log::debug!("no format registered for {:?}", raw);
        Arc::new(Unsupported::new(raw.map(String::from)))
    }
}

/// The part of a header value before its parameters.
fn bare(header: &str) -> &str {
    header.split(';').next().unwrap_or("")
}

/// Reduces a header value to its bare, lower-case mime type.
fn normalize(header: &str) -> String {
    bare(header).trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same(a: &Arc<dyn Format>, b: &Arc<dyn Format>) -> bool {
        Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
    }

    #[derive(Debug)]
    struct Custom;

    impl Format for Custom {
        fn mime_type(&self) -> Option<&str> {
            Some("application/vnd.php.serialized")
        }

        fn serialize(&self, _: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
            out.write_all(b"custom")?;
            Ok(())
        }

        fn deserialize(&self, _: &mut dyn Read) -> Result<Value, CodecError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn defaults() {
        let formats = Formats::defaults();
        assert_eq!(formats.named(Some(mime::JSON)).mime_type(), Some(mime::JSON));
        assert_eq!(formats.named(Some(mime::NDJSON)).mime_type(), Some(mime::NDJSON));
        assert_eq!(formats.named(Some(mime::FORM)).mime_type(), Some(mime::FORM));
        assert_eq!(formats.named(Some("application/vnd.github.v3+json")).mime_type(), Some(mime::JSON));

        assert!(same(
            &formats.named(Some("application/vnd.github.v3+json")),
            &formats.named(Some(mime::JSON)),
        ));
    }

    #[test]
    fn header_parameters_and_case_ignored() {
        let formats = Formats::defaults();
        assert!(formats.named(Some("application/json; charset=utf-8")).is_supported());
        assert!(formats.named(Some("  Application/JSON ")).is_supported());
        assert!(formats.named(Some("application/VND.github+json;q=1")).is_supported());
    }

    #[test]
    fn unsupported() {
        let formats = Formats::defaults();

        let format = formats.named(Some("application/vnd.php.serialized"));
        assert!(!format.is_supported());
        assert_eq!(format.mime_type(), Some("application/vnd.php.serialized"));

        let format = formats.named(Some(mime::XML));
        assert_eq!(format.mime_type(), Some(mime::XML));

        let format = formats.named(None);
        assert!(!format.is_supported());
        assert_eq!(format.mime_type(), None);
    }

    #[test]
    fn unsupported_keeps_header_text() {
        let formats = Formats::defaults();
        let cases = [
            ("Text/XML; charset=utf-8", "Text/XML"),
            (" text/csv ", " text/csv "),
            ("", ""),
            (" ; charset=utf-8", " "),
        ];

        for (header, expected) in &cases {
            let format = formats.named(Some(*header));
            assert!(!format.is_supported());
            assert_eq!(format.mime_type(), Some(*expected));
        }

        let err = formats.named(Some("")).serialize(&Value::Null, &mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err.to_string(), "cannot serialize without mime type");

        assert!(!Formats::new().named(Some(mime::JSON)).is_supported());
    }

    #[test]
    fn with_vendor_mimetype() {
        let mime = "application/vnd.php.serialized";
        let custom: Arc<dyn Format> = Arc::new(Custom);
        let formats = Formats::new().with_shared(mime, custom.clone());

        assert!(same(&formats.named(Some(mime)), &custom));
    }

    #[test]
    fn matching_vendor_mimetype() {
        let custom: Arc<dyn Format> = Arc::new(Custom);
        let formats = Formats::new().matching_shared("application/vnd.*+xml", custom.clone());

        for mime in &["application/vnd.com.example.customer+xml", "application/vnd.com.example.customer-v2+xml"] {
            assert!(same(&formats.named(Some(*mime)), &custom));
        }
    }

    #[test]
    fn exact_wins_and_patterns_in_order() {
        let first: Arc<dyn Format> = Arc::new(Custom);
        let second: Arc<dyn Format> = Arc::new(Custom);
        let formats = Formats::defaults()
            .matching_shared("application/*", first.clone())
            .matching_shared("application/*+xml", second);

        assert_eq!(formats.named(Some(mime::JSON)).mime_type(), Some(mime::JSON));
        assert!(same(&formats.named(Some("application/vnd.a+xml")), &first));
        assert!(same(&formats.named(Some("application/atom+xml")), &first));
        assert_eq!(formats.named(Some("application/vnd.a+json")).mime_type(), Some(mime::JSON));
    }

    #[test]
    fn later_registration_replaces() {
        let formats = Formats::new()
            .with(mime::JSON, Custom)
            .with(mime::JSON, Json::new());

        let mut out: Vec<u8> = Vec::new();
        formats.named(Some(mime::JSON)).serialize(&Value::Bool(true), &mut out).unwrap();
        assert_eq!(out, b"true");
    }
}
