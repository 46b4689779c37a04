use std::io::{Read, Write};

use serde_json::Value;

use crate::error::CodecError;
use crate::format::{mime, Format};

/// `application/json`. Writes dense output unless created with
/// [`Json::pretty()`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json {
    pretty: bool,
}

impl Json {
    /// A format writing JSON without insignificant whitespace.
    pub fn new() -> Json {
        Json { pretty: false }
    }

    /// A format writing indented JSON.
    pub fn pretty() -> Json {
        Json { pretty: true }
    }
}

impl Format for Json {
    fn mime_type(&self) -> Option<&str> {
        Some(mime::JSON)
    }

    fn serialize(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
        match self.pretty {
            true => serde_json::to_writer_pretty(out, value)?,
            false => serde_json::to_writer(out, value)?,
        }

        Ok(())
    }

    fn deserialize(&self, input: &mut dyn Read) -> Result<Value, CodecError> {
        Ok(serde_json::from_reader(input)?)
    }
}
