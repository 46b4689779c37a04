use time::{Duration, OffsetDateTime};

use crate::cookie::{clamp_max_age, expiry_after, Cookie, SameSite};

/// Structure that follows the builder pattern for building `Cookie` structs.
///
/// To construct a cookie:
///
///   1. Call [`Cookie::build()`] to start building.
///   2. Use any of the builder methods to set fields in the cookie.
///   3. Call [`CookieBuilder::build()`] to get the immutable `Cookie`.
///
/// `build()` is where a `Max-Age` becomes an absolute expiry: the cookie
/// expires `max_age` after that call, whatever `expires` was set to.
///
/// ```rust
/// use webrest::Cookie;
/// use time::Duration;
///
/// let cookie: Cookie = Cookie::build("name", "value")
///     .domain(".example.com")
///     .path("/")
///     .secure(true)
///     .http_only(true)
///     .max_age(Duration::days(1))
///     .build();
///
/// assert!(cookie.expires().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CookieBuilder {
    /// The cookie being built.
    cookie: Cookie,
}

impl CookieBuilder {
    /// Creates a new `CookieBuilder` instance from the given name and value.
    ///
    /// This method is typically called indirectly via [`Cookie::build()`].
    pub fn new<N, V>(name: N, value: V) -> Self
        where N: Into<String>,
              V: Into<String>
    {
        CookieBuilder { cookie: Cookie::new(name, value) }
    }

    /// Replaces the name of the cookie being built.
    #[inline]
    pub fn name<N: Into<String>>(mut self, name: N) -> Self {
        self.cookie.name = name.into();
        self
    }

    /// Sets the `expires` field in the cookie being built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::Cookie;
    /// use time::OffsetDateTime;
    ///
    /// let c = Cookie::build("foo", "bar").expires(OffsetDateTime::now_utc());
    /// assert!(c.inner().expires().is_some());
    /// ```
    #[inline]
    pub fn expires(mut self, when: OffsetDateTime) -> Self {
        self.cookie.expires = Some(when);
        self
    }

    /// Sets the `max_age` field in the cookie being built. The age is clamped
    /// into `0..=`[`MAX_AGE`](crate::cookie::MAX_AGE).
    #[inline]
    pub fn max_age(mut self, value: Duration) -> Self {
        self.cookie.max_age = Some(clamp_max_age(value));
        self
    }

    /// Sets the `domain` field in the cookie being built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::Cookie;
    ///
    /// let c = Cookie::build("foo", "bar").domain("www.rust-lang.org");
    /// assert_eq!(c.inner().domain(), Some("www.rust-lang.org"));
    /// ```
    pub fn domain<D: Into<String>>(mut self, value: D) -> Self {
        self.cookie.domain = Some(value.into());
        self
    }

    /// Sets the `path` field in the cookie being built.
    pub fn path<P: Into<String>>(mut self, path: P) -> Self {
        self.cookie.path = Some(path.into());
        self
    }

    /// Sets the `secure` field in the cookie being built.
    #[inline]
    pub fn secure(mut self, value: bool) -> Self {
        self.cookie.secure = value;
        self
    }

    /// Sets the `http_only` field in the cookie being built.
    #[inline]
    pub fn http_only(mut self, value: bool) -> Self {
        self.cookie.http_only = value;
        self
    }

    /// Sets the `same_site` field in the cookie being built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::{Cookie, SameSite};
    ///
    /// let c = Cookie::build("foo", "bar").same_site(SameSite::Strict);
    /// assert_eq!(c.inner().same_site(), Some(SameSite::Strict));
    /// ```
    #[inline]
    pub fn same_site(mut self, value: SameSite) -> Self {
        self.cookie.same_site = Some(value);
        self
    }

    /// Returns a borrow to the cookie currently being built.
    #[inline]
    pub fn inner(&self) -> &Cookie {
        &self.cookie
    }

    /// Finishes building and returns the built `Cookie`.
    pub fn build(self) -> Cookie {
        let mut cookie = self.cookie;
        if let Some(max_age) = cookie.max_age {
            cookie.expires = Some(expiry_after(max_age));
        }

        cookie
    }
}

impl From<Cookie> for CookieBuilder {
    fn from(cookie: Cookie) -> Self {
        CookieBuilder { cookie }
    }
}

impl From<CookieBuilder> for Cookie {
    fn from(builder: CookieBuilder) -> Self {
        builder.build()
    }
}
