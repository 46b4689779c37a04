//! A cookie jar for the client side of an HTTP conversation.
//!
//! A [`CookieJar`] files each cookie under the scope it applies to (schemes,
//! host and path; see [`Cookie::domain()`] and [`Cookie::path()`]) and
//! answers which cookies to send with a request to a given URL.
//!
//! Cookies received from a server go through [`CookieJar::parse()`] or
//! [`CookieJar::store()`], which check them against the origin of the
//! response before they are kept.

mod parse;
mod scope;
mod shared;

use std::collections::HashSet;
use std::fmt;
use std::iter::FromIterator;
use std::slice;

use time::OffsetDateTime;
use url::Url;

use crate::cookie::{Cookie, CookieBuilder};

pub use self::shared::SharedCookieJar;

pub(crate) use self::scope::{domain_matches, MatchKey};

/// A change to a [`CookieJar`]: a cookie to add, replace or remove.
///
/// Any of the following convert into a `CookieUpdate`, so they can be handed
/// to [`CookieJar::update()`] directly:
///
///   * a [`Cookie`] or [`CookieBuilder`], filed under the cookie's own scope
///   * a `(name, value)` pair of `&str` or `String`, filed under the scope
///     that matches every `http` or `https` URL
///   * a `(name, Option<value>)` pair, where `None` removes the cookie
///
/// A `None` value, a removal [`Cookie`] or a cookie that has already expired
/// deletes the cookie of that name in that scope.
#[derive(Debug, Clone, PartialEq)]
pub enum CookieUpdate {
    /// A name and an optional value.
    ByName(String, Option<String>),
    /// A full cookie with attributes.
    ByObject(Cookie),
}

impl CookieUpdate {
    fn into_parts(self) -> (MatchKey, String, Option<Cookie>) {
        match self {
            CookieUpdate::ByName(name, value) => {
                let cookie = value.map(|value| Cookie::new(name.clone(), value));
                (MatchKey::any(), name, cookie)
            }
            CookieUpdate::ByObject(cookie) => {
                let key = MatchKey::of(&cookie);
                let name = cookie.name().to_string();
                let live = cookie.value().is_some() && !cookie.is_expired(OffsetDateTime::now_utc());
                (key, name, live.then(|| cookie))
            }
        }
    }
}

impl From<Cookie> for CookieUpdate {
    fn from(cookie: Cookie) -> CookieUpdate {
        CookieUpdate::ByObject(cookie)
    }
}

impl From<CookieBuilder> for CookieUpdate {
    fn from(builder: CookieBuilder) -> CookieUpdate {
        CookieUpdate::ByObject(builder.build())
    }
}

impl From<(&str, &str)> for CookieUpdate {
    fn from((name, value): (&str, &str)) -> CookieUpdate {
        CookieUpdate::ByName(name.into(), Some(value.into()))
    }
}

impl From<(String, String)> for CookieUpdate {
    fn from((name, value): (String, String)) -> CookieUpdate {
        CookieUpdate::ByName(name, Some(value))
    }
}

impl From<(&str, Option<&str>)> for CookieUpdate {
    fn from((name, value): (&str, Option<&str>)) -> CookieUpdate {
        CookieUpdate::ByName(name.into(), value.map(String::from))
    }
}

impl From<(String, Option<String>)> for CookieUpdate {
    fn from((name, value): (String, Option<String>)) -> CookieUpdate {
        CookieUpdate::ByName(name, value)
    }
}

/// Something that names the URL a request goes to.
///
/// Implemented for [`Url`] and for strings, which are parsed (and thereby
/// canonicalized) first. A string that doesn't parse as an absolute URL
/// matches no cookies.
pub trait IntoUrl {
    /// Returns the canonical URL, or `None` if there is none.
    fn into_url(self) -> Option<Url>;
}

impl IntoUrl for Url {
    fn into_url(self) -> Option<Url> {
        Some(self)
    }
}

impl IntoUrl for &Url {
    fn into_url(self) -> Option<Url> {
        Some(self.clone())
    }
}

impl IntoUrl for &str {
    fn into_url(self) -> Option<Url> {
        match Url::parse(self) {
            Ok(url) => Some(url),
            Err(e) => {
                log::debug!("no cookies for unparsable URL {:?}: {}", self, e);
                None
            }
        }
    }
}

impl IntoUrl for &String {
    fn into_url(self) -> Option<Url> {
        self.as_str().into_url()
    }
}

impl IntoUrl for String {
    fn into_url(self) -> Option<Url> {
        self.as_str().into_url()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Scope {
    key: MatchKey,
    cookies: Vec<Cookie>,
}

/// A collection of cookies, each filed under the scope it applies to.
///
/// Within a scope, cookie names are unique; adding a cookie with a name that
/// already exists in its scope replaces it in place. Scopes are kept ordered
/// from most to least specific, so that [`CookieJar::valid_for()`] yields the
/// most specific cookie for every name.
///
/// # Example
///
/// ```rust
/// use webrest::{Cookie, CookieJar};
///
/// let mut jar = CookieJar::new();
/// jar.update(vec![
///     Cookie::build("session", "0x6100").domain(".example.com").path("/app").build(),
///     Cookie::build("session", "none").domain(".example.com").build(),
///     Cookie::build("lang", "de").domain("www.example.com").build(),
/// ]);
///
/// let names: Vec<_> = jar.valid_for("https://www.example.com/app/")
///     .map(|c| c.name_value())
///     .collect();
///
/// assert_eq!(names, vec![
///     ("session", Some("0x6100")),
///     ("lang", Some("de")),
/// ]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieJar {
    scopes: Vec<Scope>,
}

impl CookieJar {
    /// A jar without any cookies.
    pub const EMPTY: CookieJar = CookieJar::new();

    /// Creates an empty cookie jar.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::CookieJar;
    ///
    /// let jar = CookieJar::new();
    /// assert!(!jar.present());
    /// ```
    pub const fn new() -> CookieJar {
        CookieJar { scopes: Vec::new() }
    }

    /// Returns `true` if the jar holds at least one cookie.
    pub fn present(&self) -> bool {
        !self.scopes.is_empty()
    }

    /// Returns the number of cookies in the jar, across all scopes.
    pub fn len(&self) -> usize {
        self.scopes.iter().map(|scope| scope.cookies.len()).sum()
    }

    /// Returns `true` if the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        !self.present()
    }

    /// Removes every cookie from the jar.
    pub fn clear(&mut self) -> &mut Self {
        self.scopes.clear();
        self
    }

    /// Applies `updates` to the jar in order.
    ///
    /// Each update adds, replaces or removes the cookie of its name in its
    /// scope. See [`CookieUpdate`] for what may be passed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::CookieJar;
    ///
    /// let mut jar = CookieJar::new();
    /// jar.update(vec![("a", "1"), ("b", "2")]);
    /// jar.update(vec![("a", Some("3")), ("b", None)]);
    ///
    /// assert_eq!(jar.to_string(), "CookieJar@{\n  a=3\n}");
    /// ```
    pub fn update<I>(&mut self, updates: I) -> &mut Self
        where I: IntoIterator, I::Item: Into<CookieUpdate>
    {
        let mut applied = 0;
        for update in updates {
            self.apply(update.into());
            applied += 1;
        }

        log::trace!("applied {} cookie update(s), {} scope(s) in jar", applied, self.scopes.len());

        self.scopes.sort_by(|a, b| a.key.cmp_specificity(&b.key));
        self
    }

    /// Consumes the jar, applies `updates` and returns the result. The
    /// original jar is untouched when `self` is a clone.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::CookieJar;
    ///
    /// let base = CookieJar::EMPTY;
    /// let jar = base.clone().merge(vec![("a", "1")]);
    ///
    /// assert!(jar.present());
    /// assert!(!base.present());
    /// ```
    pub fn merge<I>(mut self, updates: I) -> CookieJar
        where I: IntoIterator, I::Item: Into<CookieUpdate>
    {
        self.update(updates);
        self
    }

    fn apply(&mut self, update: CookieUpdate) {
        let (key, name, cookie) = update.into_parts();
        let position = self.scopes.iter().position(|scope| scope.key == key);
        match (position, cookie) {
            (Some(i), Some(cookie)) => {
                let cookies = &mut self.scopes[i].cookies;
                match cookies.iter_mut().find(|c| c.name() == name) {
                    Some(existing) => *existing = cookie,
                    None => cookies.push(cookie),
                }
            }
            (None, Some(cookie)) => {
                self.scopes.push(Scope { key, cookies: vec![cookie] });
            }
            (Some(i), None) => {
                self.scopes[i].cookies.retain(|c| c.name() != name);
                if self.scopes[i].cookies.is_empty() {
                    self.scopes.remove(i);
                }
            }
            (None, None) => {}
        }
    }

    /// Returns an iterator over every cookie in the jar, most specific scope
    /// first, regardless of expiry.
    pub fn iter(&self) -> Iter<'_> {
        Iter { scopes: self.scopes.iter(), current: [].iter() }
    }

    /// Returns the cookies to send with a request to `target`, as of now.
    ///
    /// See [`CookieJar::valid_for_at()`].
    pub fn valid_for<U: IntoUrl>(&self, target: U) -> ValidFor<'_> {
        self.valid_for_at(target, OffsetDateTime::now_utc())
    }

    /// Returns the cookies to send with a request to `target` at the instant
    /// `at`.
    ///
    /// A cookie is yielded when its scope matches the URL's scheme, host and
    /// path, and it has not expired as of `at`. For each name only the first,
    /// most specific, such cookie is yielded. The iterator is lazy and holds
    /// a borrow of the jar; call this again to start over.
    ///
    /// # Example
    ///
    /// ```rust
    /// use time::{Duration, OffsetDateTime};
    /// use webrest::{Cookie, CookieJar};
    ///
    /// let now = OffsetDateTime::now_utc();
    /// let jar = CookieJar::new().merge(vec![
    ///     Cookie::build("a", "1").expires(now + Duration::hours(1)).build(),
    /// ]);
    ///
    /// assert_eq!(jar.valid_for_at("http://example.com/", now).count(), 1);
    /// assert_eq!(jar.valid_for_at("http://example.com/", now + Duration::hours(2)).count(), 0);
    /// ```
    pub fn valid_for_at<U: IntoUrl>(&self, target: U, at: OffsetDateTime) -> ValidFor<'_> {
        ValidFor {
            url: target.into_url(),
            at,
            scopes: self.scopes.iter(),
            current: [].iter(),
            yielded: HashSet::new(),
        }
    }

    /// Returns the value of a `Cookie` request header for `target`: the
    /// `existing` header value, if any, followed by the `name=value` pairs
    /// of all cookies valid for `target`, joined by `"; "`.
    ///
    /// Returns `None` when there is nothing to send.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::CookieJar;
    ///
    /// let jar = CookieJar::new().merge(vec![("lang", "de at")]);
    ///
    /// let header = jar.header_for("https://example.com/", Some("a=b"));
    /// assert_eq!(header.as_deref(), Some("a=b; lang=de%20at"));
    ///
    /// assert_eq!(CookieJar::EMPTY.header_for("https://example.com/", None), None);
    /// ```
    pub fn header_for<U: IntoUrl>(&self, target: U, existing: Option<&str>) -> Option<String> {
        let existing = existing.map(str::trim).filter(|s| !s.is_empty());
        let pairs: Vec<String> = existing.map(String::from).into_iter()
            .chain(self.valid_for(target).map(|c| c.plain().to_string()))
            .collect();

        match pairs.is_empty() {
            true => None,
            false => Some(pairs.join("; ")),
        }
    }
}

impl fmt::Display for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.present() {
            return f.write_str("CookieJar@{}");
        }

        f.write_str("CookieJar@{\n")?;
        for cookie in self.iter() {
            writeln!(f, "  {}", cookie)?;
        }

        f.write_str("}")
    }
}

impl<U: Into<CookieUpdate>> FromIterator<U> for CookieJar {
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> CookieJar {
        CookieJar::new().merge(iter)
    }
}

impl<U: Into<CookieUpdate>> Extend<U> for CookieJar {
    fn extend<I: IntoIterator<Item = U>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl<'a> IntoIterator for &'a CookieJar {
    type Item = &'a Cookie;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over all cookies in a [`CookieJar`].
///
/// Returned by [`CookieJar::iter()`].
pub struct Iter<'a> {
    scopes: slice::Iter<'a, Scope>,
    current: slice::Iter<'a, Cookie>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Cookie;

    fn next(&mut self) -> Option<&'a Cookie> {
        loop {
            if let Some(cookie) = self.current.next() {
                return Some(cookie);
            }

            self.current = self.scopes.next()?.cookies.iter();
        }
    }
}

/// Iterator over the cookies to send with one request.
///
/// Returned by [`CookieJar::valid_for()`] and [`CookieJar::valid_for_at()`].
pub struct ValidFor<'a> {
    url: Option<Url>,
    at: OffsetDateTime,
    scopes: slice::Iter<'a, Scope>,
    current: slice::Iter<'a, Cookie>,
    yielded: HashSet<&'a str>,
}

impl<'a> Iterator for ValidFor<'a> {
    type Item = &'a Cookie;

    fn next(&mut self) -> Option<&'a Cookie> {
        let url = self.url.as_ref()?;
        loop {
            for cookie in &mut self.current {
                if self.yielded.contains(cookie.name()) || cookie.is_expired(self.at) {
                    continue;
                }

                self.yielded.insert(cookie.name());
                return Some(cookie);
            }

            let scope = self.scopes.find(|scope| scope.key.matches(url))?;
            self.current = scope.cookies.iter();
        }
    }
}
