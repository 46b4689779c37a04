//! Parsing and querying of [RFC 5988] `Link` headers.
//!
//! ```rust
//! use webrest::Links;
//!
//! let links: Links = r#"<https://api.example.com/items?page=3>; rel="next",
//!     <https://api.example.com/items?page=1>; rel="prev""#.parse().unwrap();
//!
//! assert_eq!(links.uri("next"), Some("https://api.example.com/items?page=3"));
//! assert_eq!(links.uri("last"), None);
//! ```
//!
//! [RFC 5988]: https://tools.ietf.org/html/rfc5988

mod parse;

use std::collections::HashMap;
use std::fmt;
use std::slice;
use std::str::FromStr;

use crate::error::FormatError;

use self::parse::parse_links;

/// A single link: a URI and its parameters, such as `rel`.
///
/// Parameters keep the order they were given in. Values are stored without
/// surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    uri: String,
    params: Vec<(String, String)>,
}

impl Link {
    /// Creates a link to `uri` with the given `(name, value)` parameters. A
    /// repeated name overwrites the earlier value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::Link;
    ///
    /// let link = Link::new("https://example.com/?page=2", vec![("rel", "next")]);
    /// assert_eq!(link.to_string(), r#"<https://example.com/?page=2>; rel="next""#);
    /// ```
    pub fn new<U, I, K, V>(uri: U, params: I) -> Link
        where U: Into<String>,
              I: IntoIterator<Item = (K, V)>,
              K: Into<String>,
              V: Into<String>
    {
        let mut link = Link { uri: uri.into(), params: Vec::new() };
        for (name, value) in params {
            link.set(name, value);
        }

        link
    }

    pub(crate) fn set<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(param) => param.1 = value,
            None => self.params.push((name, value)),
        }
    }

    /// Returns the link's URI, verbatim.
    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the value of the parameter `name`, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns whether the parameter `name` is present.
    pub fn present(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// Returns an iterator over the `(name, value)` parameters in order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.params.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.uri)?;
        for (name, value) in self.params() {
            write!(f, "; {}=\"{}\"", name, value)?;
        }

        Ok(())
    }
}

/// A filter on link parameters, used by [`Links::all()`] and
/// [`Links::uri()`].
///
/// A link matches when it has every parameter named in the search and, for
/// each name given with a value, the link's value is equal to it.
///
/// A bare string searches by `rel`:
///
/// ```rust
/// use webrest::{Link, Search};
///
/// let link = Link::new("/?page=2", vec![("rel", "next"), ("title", "Page 2")]);
///
/// assert!(Search::from("next").matches(&link));
/// assert!(Search::from([("title", None)]).matches(&link));
/// assert!(!Search::from([("rel", Some("next")), ("hreflang", None)]).matches(&link));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search<'a> {
    terms: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> Search<'a> {
    /// A search matching every link.
    pub fn any() -> Search<'a> {
        Search::default()
    }

    /// Searches for links with `rel` equal to `value`.
    pub fn rel(value: &'a str) -> Search<'a> {
        Search::any().with("rel", value)
    }

    /// Also requires the parameter `name` to be present.
    pub fn has(mut self, name: &'a str) -> Search<'a> {
        self.terms.push((name, None));
        self
    }

    /// Also requires the parameter `name` to equal `value`.
    pub fn with(mut self, name: &'a str, value: &'a str) -> Search<'a> {
        self.terms.push((name, Some(value)));
        self
    }

    /// Returns whether `link` matches this search.
    pub fn matches(&self, link: &Link) -> bool {
        self.terms.iter().all(|&(name, expected)| match (link.param(name), expected) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        })
    }
}

impl<'a> From<&'a str> for Search<'a> {
    fn from(rel: &'a str) -> Search<'a> {
        Search::rel(rel)
    }
}

impl<'a> From<&'a [(&'a str, Option<&'a str>)]> for Search<'a> {
    fn from(terms: &'a [(&'a str, Option<&'a str>)]) -> Search<'a> {
        Search { terms: terms.to_vec() }
    }
}

impl<'a, const N: usize> From<[(&'a str, Option<&'a str>); N]> for Search<'a> {
    fn from(terms: [(&'a str, Option<&'a str>); N]) -> Search<'a> {
        Search { terms: terms.to_vec() }
    }
}

impl<'a> From<Vec<(&'a str, Option<&'a str>)>> for Search<'a> {
    fn from(terms: Vec<(&'a str, Option<&'a str>)>) -> Search<'a> {
        Search { terms }
    }
}

/// An ordered collection of [`Link`]s, typically parsed from a `Link`
/// response header.
///
/// # Example
///
/// ```rust
/// use webrest::Links;
///
/// let header = r#"<https://example.com/?page=3>; rel="next", <https://example.com/>; title="Home""#;
/// let links = Links::parse(header).unwrap();
///
/// let titled: Vec<_> = links.all([("title", None)]).map(|l| l.uri()).collect();
/// assert_eq!(titled, vec!["https://example.com/"]);
///
/// let by_rel = links.map("rel");
/// assert_eq!(by_rel["next"].uri(), "https://example.com/?page=3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct Links {
    links: Vec<Link>,
}

impl Links {
    /// Parses a `Link` header value.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] naming the expected and the found token if
    /// the header is malformed. An empty header is malformed; see
    /// [`Links::from_header()`] for optional headers.
    pub fn parse(header: &str) -> Result<Links, FormatError> {
        parse_links(header).map(Links::from)
    }

    /// Parses an optional `Link` header value. A missing or blank header
    /// yields an empty collection.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::Links;
    ///
    /// assert!(Links::from_header(None).unwrap().is_empty());
    /// assert!(Links::from_header(Some("  ")).unwrap().is_empty());
    /// assert_eq!(Links::from_header(Some("<a>; rel=next")).unwrap().len(), 1);
    /// assert!(Links::from_header(Some("<a")).is_err());
    /// ```
    pub fn from_header(header: Option<&str>) -> Result<Links, FormatError> {
        match header {
            Some(header) if !header.trim().is_empty() => Links::parse(header),
            _ => Ok(Links::default()),
        }
    }

    /// Returns the number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns whether there are no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns an iterator over all links, in header order.
    pub fn iter(&self) -> slice::Iter<'_, Link> {
        self.links.iter()
    }

    /// Returns an iterator over the links matching `search`, in header
    /// order. The iterator is lazy; call this again to start over.
    pub fn all<'s, S: Into<Search<'s>>>(&self, search: S) -> All<'_, 's> {
        All { links: self.links.iter(), search: search.into() }
    }

    /// Returns the URI of the first link matching `search`, if any. Use
    /// `unwrap_or()` on the result to supply a default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::Links;
    ///
    /// let links = Links::parse(r#"<https://example.com/?page=2>; rel="next""#).unwrap();
    /// assert_eq!(links.uri("next"), Some("https://example.com/?page=2"));
    /// assert_eq!(links.uri([("rel", Some("prev"))]).unwrap_or("https://example.com/"), "https://example.com/");
    /// ```
    pub fn uri<'s, S: Into<Search<'s>>>(&self, search: S) -> Option<&str> {
        self.all(search).next().map(Link::uri)
    }

    /// Maps each value of the parameter `param` to its link. Links without
    /// the parameter are left out; of several links with the same value, the
    /// last one wins.
    pub fn map(&self, param: &str) -> HashMap<&str, &Link> {
        self.links.iter()
            .filter_map(|link| link.param(param).map(|value| (value, link)))
            .collect()
    }
}

impl From<Vec<Link>> for Links {
    fn from(links: Vec<Link>) -> Links {
        Links { links }
    }
}

impl FromStr for Links {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Links, FormatError> {
        Links::parse(s)
    }
}

impl<'a> IntoIterator for &'a Links {
    type Item = &'a Link;
    type IntoIter = slice::Iter<'a, Link>;

    fn into_iter(self) -> slice::Iter<'a, Link> {
        self.iter()
    }
}

impl fmt::Display for Links {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.links.is_empty() {
            return f.write_str("Links@[]");
        }

        f.write_str("Links@[\n")?;
        for link in &self.links {
            writeln!(f, "  {}", link)?;
        }

        f.write_str("]")
    }
}

/// Iterator over the links matching a [`Search`].
///
/// Returned by [`Links::all()`].
pub struct All<'a, 's> {
    links: slice::Iter<'a, Link>,
    search: Search<'s>,
}

impl<'a> Iterator for All<'a, '_> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<&'a Link> {
        let search = &self.search;
        self.links.find(|link| search.matches(link))
    }
}
