use std::fmt;

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::cookie::Cookie;

/// Bytes left as-is in a cookie value sent to the server: ASCII
/// alphanumerics plus `-`, `_` and `.`.
const COOKIE_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.');

/// Wrapper around `Cookie` whose `Display` implementation only prints the
/// name and the percent-encoded value. Used for `Cookie` request headers.
///
/// A value of this type can be obtained via [`Cookie::plain()`]. This type
/// should only be used for its `Display` implementation.
///
/// # Example
///
/// ```rust
/// use webrest::Cookie;
///
/// let c = Cookie::build("name", "this; value%?").domain("example.com").build();
/// assert_eq!(&c.plain().to_string(), "name=this%3B%20value%25%3F");
/// ```
pub struct PlainCookie<'a>(pub(crate) &'a Cookie);

impl fmt::Display for PlainCookie<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0.value().unwrap_or("");
        write!(f, "{}={}", self.0.name(), percent_encode(value.as_bytes(), COOKIE_VALUE_ENCODE_SET))
    }
}
