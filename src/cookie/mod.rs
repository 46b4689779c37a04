//! The [`Cookie`] value type and its `Set-Cookie` parser.
//!
//! A `Cookie` is immutable once built. Cookies are created by parsing a
//! `Set-Cookie` header value with [`Cookie::parse()`] (or, with origin
//! checks, by [`CookieJar::parse()`](crate::CookieJar::parse())), or directly
//! with [`Cookie::new()`] and [`Cookie::build()`].

mod builder;
mod parse;
mod plain;
pub mod prefix;
mod same_site;

use std::fmt;
use std::str::FromStr;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

pub use self::builder::CookieBuilder;
pub use self::plain::PlainCookie;
pub use self::same_site::SameSite;
pub use crate::error::ParseError;

pub(crate) use self::parse::{parse_set_cookie, SetCookie};

// Formats used for the `Expires` attribute. `FMT1` is also the output format.
pub(crate) static FMT1: &[BorrowedFormatItem<'_>] = format_description!("[weekday repr:short], [day] [month repr:short] [year padding:none] [hour]:[minute]:[second] GMT");
pub(crate) static FMT2: &[BorrowedFormatItem<'_>] = format_description!("[weekday], [day]-[month repr:short]-[year repr:last_two] [hour]:[minute]:[second] GMT");
pub(crate) static FMT3: &[BorrowedFormatItem<'_>] = format_description!("[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year padding:none]");
pub(crate) static FMT4: &[BorrowedFormatItem<'_>] = format_description!("[weekday repr:short], [day]-[month repr:short]-[year padding:none] [hour]:[minute]:[second] GMT");

/// The longest `Max-Age` kept: the [400 day limit] of RFC 6265bis. Longer
/// ages, as well as negative ones, are clamped into `0..=MAX_AGE`.
///
/// [400 day limit]:
/// https://datatracker.ietf.org/doc/html/draft-ietf-httpbis-rfc6265bis#name-the-max-age-attribute
pub const MAX_AGE: Duration = Duration::days(400);

pub(crate) fn clamp_max_age(age: Duration) -> Duration {
    age.max(Duration::ZERO).min(MAX_AGE)
}

/// The instant a cookie with the given `Max-Age` expires, counted from now.
pub(crate) fn expiry_after(max_age: Duration) -> OffsetDateTime {
    OffsetDateTime::now_utc().saturating_add(max_age)
}

/// Representation of an HTTP cookie.
///
/// A cookie whose value is `None` is a _removal_ cookie: handing it to
/// [`CookieJar::update()`](crate::CookieJar::update()) deletes the cookie of
/// the same name and scope.
///
/// # Constructing a `Cookie`
///
/// ```rust
/// use webrest::Cookie;
///
/// let cookie = Cookie::new("name", "value");
/// assert_eq!(&cookie.to_string(), "name=value");
/// ```
///
/// To set attributes, use [`Cookie::build()`]:
///
/// ```rust
/// use webrest::Cookie;
///
/// let cookie = Cookie::build("name", "value")
///     .domain(".example.com")
///     .path("/")
///     .secure(true)
///     .http_only(true)
///     .build();
///
/// assert_eq!(cookie.domain(), Some(".example.com"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Cookie {
    /// The cookie's name.
    name: String,
    /// The cookie's value; `None` marks a removal.
    value: Option<String>,
    /// The cookie's expiration, if any. Derived from `max_age` when set.
    expires: Option<OffsetDateTime>,
    /// The cookie's maximum age, if any.
    max_age: Option<Duration>,
    /// The cookie's domain, if any.
    domain: Option<String>,
    /// The cookie's path, if any.
    path: Option<String>,
    /// Whether this cookie was marked Secure.
    secure: bool,
    /// Whether this cookie was marked HttpOnly.
    http_only: bool,
    /// The draft `SameSite` attribute.
    same_site: Option<SameSite>,
}

impl Cookie {
    /// Creates a new `Cookie` with the given name and value and no
    /// attributes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::Cookie;
    ///
    /// let cookie = Cookie::new("name", "value");
    /// assert_eq!(cookie.name_value(), ("name", Some("value")));
    /// ```
    pub fn new<N, V>(name: N, value: V) -> Cookie
        where N: Into<String>,
              V: Into<String>
    {
        Cookie::with_value(name, Some(value.into()))
    }

    /// Creates a removal `Cookie`: one without a value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::Cookie;
    ///
    /// let cookie = Cookie::removal("session");
    /// assert_eq!(cookie.value(), None);
    /// ```
    pub fn removal<N: Into<String>>(name: N) -> Cookie {
        Cookie::with_value(name, None)
    }

    pub(crate) fn with_value<N: Into<String>>(name: N, value: Option<String>) -> Cookie {
        Cookie {
            name: name.into(),
            value,
            expires: None,
            max_age: None,
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Creates a new `CookieBuilder` from the given name and value.
    ///
    /// # Example
    ///
    /// ```
    /// use webrest::Cookie;
    ///
    /// let c = Cookie::build("foo", "bar").path("/").build();
    /// assert_eq!(c.path(), Some("/"));
    /// ```
    #[inline(always)]
    pub fn build<N, V>(name: N, value: V) -> CookieBuilder
        where N: Into<String>,
              V: Into<String>
    {
        CookieBuilder::new(name, value)
    }

    /// Parses a single `Set-Cookie` header value.
    ///
    /// No origin or prefix checks are applied; the name is kept verbatim.
    /// Use [`CookieJar::parse()`](crate::CookieJar::parse()) for cookies
    /// received from a server.
    ///
    /// # Example
    ///
    /// ```
    /// use webrest::Cookie;
    ///
    /// let c = Cookie::parse("foo=bar; HttpOnly").unwrap();
    /// assert_eq!(c.name_value(), ("foo", Some("bar")));
    /// assert!(c.http_only());
    /// ```
    pub fn parse(s: &str) -> Result<Cookie, ParseError> {
        parse_set_cookie(s).map(SetCookie::into_cookie)
    }

    /// Returns the name of `self`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of `self`, `None` for a removal cookie.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the name and value of `self` as a tuple of `(name, value)`.
    #[inline(always)]
    pub fn name_value(&self) -> (&str, Option<&str>) {
        (self.name(), self.value())
    }

    /// Returns whether this cookie was marked `HttpOnly` or not.
    #[inline]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Returns whether this cookie was marked `Secure` or not.
    ///
    /// # Example
    ///
    /// ```
    /// use webrest::Cookie;
    ///
    /// let c = Cookie::parse("name=value; Secure").unwrap();
    /// assert_eq!(c.secure(), true);
    /// ```
    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Returns the `SameSite` attribute of this cookie if one was specified.
    #[inline]
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// Returns the specified max-age of the cookie if one was specified.
    ///
    /// # Example
    ///
    /// ```
    /// use webrest::Cookie;
    ///
    /// let c = Cookie::parse("name=value").unwrap();
    /// assert_eq!(c.max_age(), None);
    ///
    /// let c = Cookie::parse("name=value; Max-Age=3600").unwrap();
    /// assert_eq!(c.max_age().map(|age| age.whole_hours()), Some(1));
    /// ```
    #[inline]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Returns the `Path` of the cookie if one was specified.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the `Domain` of the cookie if one was specified.
    ///
    /// A leading `.` marks a cookie that also applies to subdomains; without
    /// it the cookie belongs to that exact host only.
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns the effective expiry of the cookie.
    ///
    /// When the cookie carries a `Max-Age`, this is the instant the cookie
    /// was constructed plus that age, regardless of any `Expires` attribute.
    ///
    /// # Example
    ///
    /// ```
    /// use webrest::Cookie;
    ///
    /// let c = Cookie::parse("name=value").unwrap();
    /// assert_eq!(c.expires(), None);
    ///
    /// let c = Cookie::parse("name=value; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
    /// assert_eq!(c.expires().map(|t| t.year()), Some(2015));
    /// ```
    #[inline]
    pub fn expires(&self) -> Option<OffsetDateTime> {
        self.expires
    }

    /// Whether the cookie has expired as of `at`. Session cookies (no
    /// expiry) never expire.
    pub fn is_expired(&self, at: OffsetDateTime) -> bool {
        match self.expires {
            Some(expires) => expires <= at,
            None => false,
        }
    }

    /// Wraps `self` in a [`PlainCookie`], which displays as the `name=value`
    /// pair for a `Cookie` request header.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::Cookie;
    ///
    /// let c = Cookie::build("lang", "de at").path("/").build();
    /// assert_eq!(c.plain().to_string(), "lang=de%20at");
    /// ```
    #[inline]
    pub fn plain(&self) -> PlainCookie<'_> {
        PlainCookie(self)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name(), self.value().unwrap_or(""))?;

        if self.http_only() {
            write!(f, "; HttpOnly")?;
        }

        if let Some(same_site) = self.same_site() {
            write!(f, "; SameSite={}", same_site)?;
        }

        if self.secure() {
            write!(f, "; Secure")?;
        }

        if let Some(path) = self.path() {
            write!(f, "; Path={}", path)?;
        }

        if let Some(domain) = self.domain() {
            write!(f, "; Domain={}", domain)?;
        }

        if let Some(max_age) = self.max_age() {
            write!(f, "; Max-Age={}", max_age.whole_seconds())?;
        }

        if let Some(time) = self.expires() {
            let time = time.to_offset(UtcOffset::UTC);
            write!(f, "; Expires={}", time.format(&FMT1).map_err(|_| fmt::Error)?)?;
        }

        Ok(())
    }
}

impl FromStr for Cookie {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Cookie, ParseError> {
        Cookie::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn format() {
        let cookie = Cookie::new("foo", "bar");
        assert_eq!(&cookie.to_string(), "foo=bar");

        let cookie = Cookie::build("foo", "bar").http_only(true).build();
        assert_eq!(&cookie.to_string(), "foo=bar; HttpOnly");

        let cookie = Cookie::build("foo", "bar").secure(true).build();
        assert_eq!(&cookie.to_string(), "foo=bar; Secure");

        let cookie = Cookie::build("foo", "bar").path("/").build();
        assert_eq!(&cookie.to_string(), "foo=bar; Path=/");

        let cookie = Cookie::build("foo", "bar").domain(".example.com").build();
        assert_eq!(&cookie.to_string(), "foo=bar; Domain=.example.com");

        let cookie = Cookie::build("foo", "bar").same_site(SameSite::Lax).build();
        assert_eq!(&cookie.to_string(), "foo=bar; SameSite=Lax");

        let expires = datetime!(2015-10-21 07:28:00 UTC);
        let cookie = Cookie::build("foo", "bar").expires(expires).build();
        assert_eq!(&cookie.to_string(), "foo=bar; Expires=Wed, 21 Oct 2015 07:28:00 GMT");

        assert_eq!(&Cookie::removal("foo").to_string(), "foo=");
    }

    #[test]
    fn max_age_wins_over_expires() {
        let before = OffsetDateTime::now_utc();
        let cookie = Cookie::build("foo", "bar")
            .expires(datetime!(2015-10-21 07:28:00 UTC))
            .max_age(Duration::hours(1))
            .build();
        let after = OffsetDateTime::now_utc();

        let expires = cookie.expires().unwrap();
        assert!(expires >= before + Duration::hours(1));
        assert!(expires <= after + Duration::hours(1));
        assert_eq!(cookie.max_age(), Some(Duration::hours(1)));
    }

    #[test]
    fn expiry() {
        let now = OffsetDateTime::now_utc();
        assert!(!Cookie::new("a", "b").is_expired(now));

        let past = Cookie::build("a", "b").expires(now - Duration::days(1)).build();
        assert!(past.is_expired(now));

        let future = Cookie::build("a", "b").expires(now + Duration::days(1)).build();
        assert!(!future.is_expired(now));

        let zero = Cookie::build("a", "b").max_age(Duration::ZERO).build();
        assert!(zero.is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn structural_equality() {
        let a = Cookie::build("a", "b").path("/").build();
        assert_eq!(a, Cookie::build("a", "b").path("/").build());
        assert_ne!(a, Cookie::build("a", "b").path("/x").build());
        assert_ne!(a, Cookie::build("a", "c").path("/").build());
        assert_ne!(Cookie::new("a", ""), Cookie::removal("a"));
    }
}
