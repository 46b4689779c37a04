use std::io::{Read, Write};

use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::format::{mime, Format};

/// `application/x-www-form-urlencoded`.
///
/// Serializes a flat JSON object whose values are strings, numbers or
/// booleans. Deserializes into an object of strings; of repeated keys the
/// last one wins.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use webrest::format::{Format, FormUrlencoded};
///
/// let mut out: Vec<u8> = Vec::new();
/// FormUrlencoded::new().serialize(&json!({"q": "rust lang", "page": 2}), &mut out).unwrap();
/// assert_eq!(out, b"page=2&q=rust+lang");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormUrlencoded;

impl FormUrlencoded {
    /// A format for flat, URL-encoded key/value pairs.
    pub fn new() -> FormUrlencoded {
        FormUrlencoded
    }
}

impl Format for FormUrlencoded {
    fn mime_type(&self) -> Option<&str> {
        Some(mime::FORM)
    }

    fn serialize(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
        let encoded = serde_urlencoded::to_string(value)?;
        out.write_all(encoded.as_bytes())?;
        Ok(())
    }

    fn deserialize(&self, input: &mut dyn Read) -> Result<Value, CodecError> {
        let mut body = String::new();
        input.read_to_string(&mut body)?;

        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&body)?;
        let mut object = Map::new();
        for (key, value) in pairs {
            object.insert(key, Value::String(value));
        }

        Ok(Value::Object(object))
    }
}
