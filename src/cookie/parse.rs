use std::convert::TryFrom;
use std::mem;

use percent_encoding::percent_decode_str;
use time::format_description::BorrowedFormatItem;
use time::parsing::Parsed;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use crate::cookie::{clamp_max_age, expiry_after, Cookie, SameSite, FMT1, FMT2, FMT3, FMT4};
use crate::error::ParseError;

/// Attributes read from the tail of a `Set-Cookie` value. Unknown attributes
/// are dropped; a repeated attribute overwrites the earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Attributes {
    pub domain: Option<String>,
    pub path: Option<String>,
    pub expires: Option<OffsetDateTime>,
    pub max_age: Option<Duration>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl Attributes {
    fn apply(&mut self, name: &str, value: Option<String>) {
        let name = name.trim();
        if name.eq_ignore_ascii_case("secure") {
            self.secure = true;
        } else if name.eq_ignore_ascii_case("httponly") {
            self.http_only = true;
        } else if let Some(value) = value {
            if name.eq_ignore_ascii_case("domain") {
                if !value.is_empty() {
                    self.domain = Some(value);
                }
            } else if name.eq_ignore_ascii_case("path") {
                if value.starts_with('/') {
                    self.path = Some(value);
                }
            } else if name.eq_ignore_ascii_case("max-age") {
                if let Ok(seconds) = value.parse::<i64>() {
                    self.max_age = Some(clamp_max_age(Duration::seconds(seconds)));
                }
            } else if name.eq_ignore_ascii_case("expires") {
                if let Some(expires) = parse_expires(&value) {
                    self.expires = Some(expires);
                }
            } else if name.eq_ignore_ascii_case("samesite") {
                self.same_site = value.parse().ok();
            }
        }
    }
}

/// A `Set-Cookie` value split into its parts, before any origin checks.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SetCookie {
    pub name: String,
    pub value: Option<String>,
    pub attributes: Attributes,
}

impl SetCookie {
    /// Builds the cookie under `name`, resolving `Max-Age` now.
    pub fn into_named_cookie(self, name: String) -> Cookie {
        let a = self.attributes;
        let mut cookie = Cookie::with_value(name, self.value);
        cookie.domain = a.domain;
        cookie.path = a.path;
        cookie.secure = a.secure;
        cookie.http_only = a.http_only;
        cookie.same_site = a.same_site;
        cookie.max_age = a.max_age;
        cookie.expires = match a.max_age {
            Some(max_age) => Some(expiry_after(max_age)),
            None => a.expires,
        };

        cookie
    }

    pub fn into_cookie(self) -> Cookie {
        let name = self.name.clone();
        self.into_named_cookie(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Name,
    Value,
    QuotedValue,
    AfterQuotedValue,
    AttrName,
    AttrValue,
    QuotedAttrValue,
    AfterQuotedAttrValue,
}

/// Splits a `Set-Cookie` value into name, value and attributes.
///
/// The value and attribute values may be enclosed in double quotes, which are
/// removed; quoted text may contain `;`. Values are URL-decoded. A bare empty
/// value (`name=`) yields `value: None`, the removal signal, while `name=""`
/// is a cookie with an empty value.
pub(crate) fn parse_set_cookie(s: &str) -> Result<SetCookie, ParseError> {
    let mut state = State::Name;
    let mut name = String::new();
    let mut value = String::new();
    let mut quoted = false;
    let mut attr_name = String::new();
    let mut attr_value = String::new();
    let mut attributes = Attributes::default();

    for c in s.chars() {
        state = match (state, c) {
            (State::Name, '=') => State::Value,
            (State::Name, ';') => return Err(ParseError::MissingPair),
            (State::Name, c) => { name.push(c); State::Name }

            (State::Value, '"') if value.trim().is_empty() => {
                value.clear();
                quoted = true;
                State::QuotedValue
            }
            (State::Value, ';') => State::AttrName,
            (State::Value, c) => { value.push(c); State::Value }

            (State::QuotedValue, '"') => State::AfterQuotedValue,
            (State::QuotedValue, c) => { value.push(c); State::QuotedValue }

            (State::AfterQuotedValue, ';') => State::AttrName,
            (State::AfterQuotedValue, _) => State::AfterQuotedValue,

            (State::AttrName, '=') => State::AttrValue,
            (State::AttrName, ';') => {
                attributes.apply(&mem::take(&mut attr_name), None);
                State::AttrName
            }
            (State::AttrName, c) => { attr_name.push(c); State::AttrName }

            (State::AttrValue, '"') if attr_value.trim().is_empty() => {
                attr_value.clear();
                State::QuotedAttrValue
            }
            (State::AttrValue, ';') => {
                let value = url_decode(attr_value.trim());
                attr_value.clear();
                attributes.apply(&mem::take(&mut attr_name), Some(value));
                State::AttrName
            }
            (State::AttrValue, c) => { attr_value.push(c); State::AttrValue }

            (State::QuotedAttrValue, '"') => State::AfterQuotedAttrValue,
            (State::QuotedAttrValue, c) => { attr_value.push(c); State::QuotedAttrValue }

            (State::AfterQuotedAttrValue, ';') => {
                let value = url_decode(&mem::take(&mut attr_value));
                attributes.apply(&mem::take(&mut attr_name), Some(value));
                State::AttrName
            }
            (State::AfterQuotedAttrValue, _) => State::AfterQuotedAttrValue,
        };
    }

    match state {
        State::Name => return Err(ParseError::MissingPair),
        State::AttrName if !attr_name.trim().is_empty() => attributes.apply(&attr_name, None),
        State::AttrValue => attributes.apply(&attr_name, Some(url_decode(attr_value.trim()))),
        State::QuotedAttrValue | State::AfterQuotedAttrValue => {
            attributes.apply(&attr_name, Some(url_decode(&attr_value)))
        }
        _ => {}
    }

    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }

    let value = match quoted {
        true => Some(url_decode(&value)),
        false => Some(url_decode(value.trim())).filter(|value| !value.is_empty()),
    };

    Ok(SetCookie { name: name.to_string(), value, attributes })
}

/// Decodes `application/x-www-form-urlencoded` style text: `+` is a space
/// and `%XX` escapes are resolved. Invalid UTF-8 is replaced.
pub(crate) fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}

fn parse_expires(s: &str) -> Option<OffsetDateTime> {
    let s = s.trim();
    [FMT1, FMT2, FMT3, FMT4].iter()
        .find_map(|format| parse_date(s, format))
}

fn parse_date(s: &str, format: &[BorrowedFormatItem<'_>]) -> Option<OffsetDateTime> {
    let mut parsed = Parsed::new();
    let rest = parsed.parse_items(s.as_bytes(), format).ok()?;
    if !rest.is_empty() {
        return None;
    }

    // Two-digit years, as in RFC 850 dates, are resolved the way browsers do.
    if let Some(y) = parsed.year().or_else(|| parsed.year_last_two().map(i32::from)) {
        let offset = match y {
            0..=68 => 2000,
            69..=99 => 1900,
            _ => 0,
        };
        parsed.set_year(y + offset)?;
    }

    PrimitiveDateTime::try_from(parsed).ok().map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    macro_rules! assert_parse {
        ($string:expr, $name:expr, $value:expr) => ({
            let parsed = parse_set_cookie($string).expect("parses");
            assert_eq!(parsed.name, $name);
            assert_eq!(parsed.value.as_deref(), $value);
            parsed.attributes
        })
    }

    #[test]
    fn name_and_value() {
        assert_parse!("session=0x6100", "session", Some("0x6100"));
        assert_parse!("  session = 0x6100  ", "session", Some("0x6100"));
        assert_parse!("session=0x6100;", "session", Some("0x6100"));
        assert_parse!("a=b=c", "a", Some("b=c"));
        assert_parse!("q=a%20b+c", "q", Some("a b c"));
    }

    #[test]
    fn empty_value_is_removal() {
        assert_parse!("test=", "test", None);
        assert_parse!("test=; Path=/", "test", None);
        assert_parse!("test=  ", "test", None);
    }

    #[test]
    fn quoted_empty_value_is_kept() {
        assert_parse!("test=\"\"", "test", Some(""));
        assert_parse!("test=\"\"; Path=/", "test", Some(""));
    }

    #[test]
    fn quoted_value() {
        assert_parse!("a=\"b; c\"", "a", Some("b; c"));
        assert_parse!("a=\"%20x+y\"; Secure", "a", Some(" x y"));
        let attrs = assert_parse!("a=\"b\"junk; HttpOnly", "a", Some("b"));
        assert!(attrs.http_only);
    }

    #[test]
    fn missing_pair() {
        assert_eq!(parse_set_cookie("session"), Err(ParseError::MissingPair));
        assert_eq!(parse_set_cookie("session; a=b"), Err(ParseError::MissingPair));
        assert_eq!(parse_set_cookie(""), Err(ParseError::MissingPair));
        assert_eq!(parse_set_cookie(" =value"), Err(ParseError::EmptyName));
    }

    #[test]
    fn attributes() {
        let attrs = assert_parse!(
            "session=0x6100; HttpOnly; Secure; Path=/app; Domain=example.com; SameSite=Lax",
            "session", Some("0x6100")
        );

        assert!(attrs.http_only);
        assert!(attrs.secure);
        assert_eq!(attrs.path.as_deref(), Some("/app"));
        assert_eq!(attrs.domain.as_deref(), Some("example.com"));
        assert_eq!(attrs.same_site, Some(SameSite::Lax));
    }

    #[test]
    fn attribute_names_ignore_case() {
        let attrs = assert_parse!("a=b; secure; httponly; path=/; DOMAIN=x.org", "a", Some("b"));
        assert!(attrs.secure);
        assert!(attrs.http_only);
        assert_eq!(attrs.path.as_deref(), Some("/"));
        assert_eq!(attrs.domain.as_deref(), Some("x.org"));
    }

    #[test]
    fn unusable_attributes_dropped() {
        let attrs = assert_parse!("a=b; Path=relative; Domain=; Max-Age=soon; Foo=bar; Path", "a", Some("b"));
        assert_eq!(attrs, Attributes::default());
    }

    #[test]
    fn quoted_attribute_value() {
        let attrs = assert_parse!("a=b; Path=\"/x;y\"; Secure", "a", Some("b"));
        assert_eq!(attrs.path.as_deref(), Some("/x;y"));
        assert!(attrs.secure);

        let attrs = assert_parse!("a=b; Path=\"/z\"", "a", Some("b"));
        assert_eq!(attrs.path.as_deref(), Some("/z"));

        let attrs = assert_parse!("a=b; Path=\"/a%20b\"", "a", Some("b"));
        assert_eq!(attrs.path.as_deref(), Some("/a b"));
    }

    #[test]
    fn max_age() {
        let attrs = assert_parse!("a=b; Max-Age=3600", "a", Some("b"));
        assert_eq!(attrs.max_age, Some(Duration::hours(1)));

        let attrs = assert_parse!("a=b; Max-Age=-1", "a", Some("b"));
        assert_eq!(attrs.max_age, Some(Duration::ZERO));

        let attrs = assert_parse!("a=b; Max-Age=9223372036854775807", "a", Some("b"));
        assert_eq!(attrs.max_age, Some(Duration::days(400)));

        let attrs = assert_parse!("a=b; Max-Age=-9223372036854775808", "a", Some("b"));
        assert_eq!(attrs.max_age, Some(Duration::ZERO));

        // Out of `i64` range: not a number.
        let attrs = assert_parse!("a=b; Max-Age=99999999999999999999", "a", Some("b"));
        assert_eq!(attrs.max_age, None);
    }

    #[test]
    fn expires_formats() {
        let expected = datetime!(2015-10-21 07:28:00 UTC);
        for date in &[
            "Wed, 21 Oct 2015 07:28:00 GMT",
            "Wednesday, 21-Oct-15 07:28:00 GMT",
            "Wed Oct 21 07:28:00 2015",
            "Wed, 21-Oct-2015 07:28:00 GMT",
        ] {
            let header = format!("a=b; Expires={}", date);
            let attrs = assert_parse!(&header, "a", Some("b"));
            assert_eq!(attrs.expires, Some(expected), "{}", date);
        }

        let attrs = assert_parse!("a=b; Expires=Thursday, 01-Jan-70 00:00:01 GMT", "a", Some("b"));
        assert_eq!(attrs.expires, Some(datetime!(1970-01-01 00:00:01 UTC)));

        let attrs = assert_parse!("a=b; Expires=tomorrow", "a", Some("b"));
        assert_eq!(attrs.expires, None);
    }

    #[test]
    fn max_age_resolves_expiry() {
        let before = OffsetDateTime::now_utc();
        let cookie = parse_set_cookie("a=b; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Max-Age=60")
            .unwrap()
            .into_cookie();

        assert!(cookie.expires().unwrap() >= before + Duration::seconds(60));
    }

    #[test]
    fn url_decoding() {
        assert_eq!(url_decode("a+b%2Cc"), "a b,c");
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%C3%BC"), "ü");
    }
}
