use std::borrow::Borrow;
use std::io::{self, BufRead, BufReader, Read, Write};

use serde_json::Value;

use crate::error::CodecError;
use crate::format::{mime, Format};

/// [Newline-delimited JSON](http://ndjson.org): one JSON document per line.
///
/// As a [`Format`], a single value is written as-is and reading yields an
/// array of all documents. [`NdJson::serialize_iter()`] and
/// [`NdJson::deserialize_iter()`] stream documents one by one.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use webrest::format::NdJson;
///
/// let mut out: Vec<u8> = Vec::new();
/// NdJson::new().serialize_iter(vec![json!(1), json!({"a": 2})], &mut out).unwrap();
/// assert_eq!(out, b"1\n{\"a\":2}\n");
///
/// let values: Vec<_> = NdJson::new()
///     .deserialize_iter(&out[..])
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(values, vec![json!(1), json!({"a": 2})]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NdJson;

impl NdJson {
    /// A format writing and reading one JSON document per line.
    pub fn new() -> NdJson {
        NdJson
    }

    /// Writes each of `values` as dense JSON followed by `\n`.
    pub fn serialize_iter<I, W>(&self, values: I, mut out: W) -> Result<(), CodecError>
        where I: IntoIterator, I::Item: Borrow<Value>, W: Write
    {
        for value in values {
            serde_json::to_writer(&mut out, value.borrow())?;
            out.write_all(b"\n")?;
        }

        Ok(())
    }

    /// Returns a lazy iterator over the documents in `input`, skipping blank
    /// lines.
    pub fn deserialize_iter<R: BufRead>(&self, input: R) -> Values<R> {
        Values { lines: input.lines() }
    }
}

impl Format for NdJson {
    fn mime_type(&self) -> Option<&str> {
        Some(mime::NDJSON)
    }

    fn serialize(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
        serde_json::to_writer(out, value)?;
        Ok(())
    }

    fn deserialize(&self, input: &mut dyn Read) -> Result<Value, CodecError> {
        self.deserialize_iter(BufReader::new(input))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

/// Iterator over newline-delimited JSON documents.
///
/// Returned by [`NdJson::deserialize_iter()`].
pub struct Values<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> Iterator for Values<R> {
    type Item = Result<Value, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };

            if !line.trim().is_empty() {
                return Some(serde_json::from_str(&line).map_err(CodecError::from));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn written<I>(values: I) -> String
        where I: IntoIterator, I::Item: Borrow<Value>
    {
        let mut out: Vec<u8> = Vec::new();
        NdJson::new().serialize_iter(values, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn read(input: &str) -> Value {
        NdJson::new().deserialize(&mut input.as_bytes()).unwrap()
    }

    #[test]
    fn serialize_iter() {
        assert_eq!(written(vec![json!("some"), json!("value")]), "\"some\"\n\"value\"\n");
        assert_eq!(written(&[json!({"key": "value"})]), "{\"key\":\"value\"}\n");
        assert_eq!(
            written(vec![json!({"key": "value"}), json!({"other": "value"})]),
            "{\"key\":\"value\"}\n{\"other\":\"value\"}\n"
        );
        assert_eq!(written((1..=3).map(|i| json!(i))), "1\n2\n3\n");
        assert_eq!(written(Vec::<Value>::new()), "");
    }

    #[test]
    fn serialize_single_value() {
        for (value, expected) in vec![
            (json!({}), "{}"),
            (json!([]), "[]"),
            (json!({"key": "value"}), "{\"key\":\"value\"}"),
        ] {
            let mut out: Vec<u8> = Vec::new();
            NdJson::new().serialize(&value, &mut out).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), expected);
        }
    }

    #[test]
    fn deserialize() {
        assert_eq!(read("\"some\"\n\"value\"\n"), json!(["some", "value"]));
        assert_eq!(read("{\"key\":\"value\"}"), json!([{"key": "value"}]));
        assert_eq!(
            read("{\"key\":\"value\"}\n{\"other\":\"value\"}\n"),
            json!([{"key": "value"}, {"other": "value"}])
        );
        assert_eq!(read("1\r\n\n  \n2"), json!([1, 2]));
        assert_eq!(read(""), json!([]));
    }

    #[test]
    fn deserialize_iter_stops_at_error() {
        let mut values = NdJson::new().deserialize_iter("1\n{oops\n3\n".as_bytes());
        assert_eq!(values.next().unwrap().unwrap(), json!(1));
        assert!(matches!(values.next(), Some(Err(CodecError::Json(_)))));
        assert_eq!(values.next().unwrap().unwrap(), json!(3));
        assert!(values.next().is_none());

        assert!(NdJson::new().deserialize(&mut "1\n{oops\n".as_bytes()).is_err());
    }
}
