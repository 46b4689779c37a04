//! [HTTP RFC6265 draft] cookie name prefixes.
//!
//! A server may only set a cookie named `__Host-…` or `__Secure-…` when the
//! cookie carries the attributes the prefix promises. [`CookieJar::parse()`]
//! drops prefixed cookies that break these promises and stores the accepted
//! ones under their unprefixed name.
//!
//! [HTTP RFC6265 draft]:
//! https://datatracker.ietf.org/doc/html/draft-ietf-httpbis-rfc6265bis#name-cookie-name-prefixes
//! [`CookieJar::parse()`]: crate::CookieJar::parse()

use crate::cookie::parse::Attributes;

/// The [`"__Host-"`] cookie [`Prefix`].
///
/// [`"__Host-"`]:
/// https://datatracker.ietf.org/doc/html/draft-ietf-httpbis-rfc6265bis#name-the-__host-prefix
pub struct Host;

/// The [`"__Secure-"`] cookie [`Prefix`].
///
/// [`"__Secure-"`]:
/// https://datatracker.ietf.org/doc/html/draft-ietf-httpbis-rfc6265bis#name-the-__secure-prefix
pub struct Secure;

/// Trait identifying [HTTP RFC6265 draft] cookie prefixes.
///
/// [HTTP RFC6265 draft]:
/// https://datatracker.ietf.org/doc/html/draft-ietf-httpbis-rfc6265bis#name-cookie-name-prefixes
pub trait Prefix: private::Sealed {
    /// The prefix string, matched case-sensitively.
    const PREFIX: &'static str;

    /// Whether a cookie with the given `Secure` flag, `Path` and `Domain`
    /// attributes may carry the prefix.
    fn permits(secure: bool, path: Option<&str>, domain: Option<&str>) -> bool;

    /// Returns `name` without the prefix, or `None` if `name` doesn't start
    /// with it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::prefix::{Host, Prefix};
    ///
    /// assert_eq!(Host::clip("__Host-SID"), Some("SID"));
    /// assert_eq!(Host::clip("SID"), None);
    /// ```
    fn clip(name: &str) -> Option<&str> {
        name.strip_prefix(Self::PREFIX)
    }
}

impl Prefix for Host {
    const PREFIX: &'static str = "__Host-";

    /// According to [RFC 6265bis-12 §4.1.3.2]:
    ///
    /// ```text
    /// If a cookie's name begins with a case-sensitive match for the string
    /// __Host-, then the cookie will have been set with a Secure attribute,
    /// a Path attribute with a value of /, and no Domain attribute.
    /// ```
    ///
    /// [RFC 6265bis-12 §4.1.3.2]:
    /// https://datatracker.ietf.org/doc/html/draft-ietf-httpbis-rfc6265bis#name-the-__host-prefix
    fn permits(secure: bool, path: Option<&str>, domain: Option<&str>) -> bool {
        secure && path == Some("/") && domain.is_none()
    }
}

impl Prefix for Secure {
    const PREFIX: &'static str = "__Secure-";

    /// According to [RFC 6265bis-12 §4.1.3.1]:
    ///
    /// ```text
    /// If a cookie's name begins with a case-sensitive match for the string
    /// __Secure-, then the cookie will have been set with a Secure
    /// attribute.
    /// ```
    ///
    /// [RFC 6265bis-12 §4.1.3.1]:
    /// https://datatracker.ietf.org/doc/html/draft-ietf-httpbis-rfc6265bis#name-the-__secure-prefix
    fn permits(secure: bool, _: Option<&str>, _: Option<&str>) -> bool {
        secure
    }
}

/// Applies the prefix rules to a cookie `name`.
///
/// Returns the name to store the cookie under, or `None` if the cookie must
/// be rejected.
pub(crate) fn unprefixed<'n>(name: &'n str, attributes: &Attributes) -> Option<&'n str> {
    fn check<'n, P: Prefix>(name: &'n str, attributes: &Attributes) -> Option<Option<&'n str>> {
        let clipped = P::clip(name)?;
        let a = attributes;
        Some(if P::permits(a.secure, a.path.as_deref(), a.domain.as_deref()) {
            Some(clipped)
        } else {
            None
        })
    }

    check::<Host>(name, attributes)
        .or_else(|| check::<Secure>(name, attributes))
        .unwrap_or(Some(name))
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::Host {}
    impl Sealed for super::Secure {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(secure: bool, path: Option<&str>, domain: Option<&str>) -> Attributes {
        Attributes {
            secure,
            path: path.map(String::from),
            domain: domain.map(String::from),
            ..Attributes::default()
        }
    }

    #[test]
    fn host_prefix() {
        assert_eq!(unprefixed("__Host-SID", &attrs(true, Some("/"), None)), Some("SID"));
        assert_eq!(unprefixed("__Host-SID", &attrs(false, Some("/"), None)), None);
        assert_eq!(unprefixed("__Host-SID", &attrs(true, None, None)), None);
        assert_eq!(unprefixed("__Host-SID", &attrs(true, Some("/app"), None)), None);
        assert_eq!(unprefixed("__Host-SID", &attrs(true, Some("/"), Some("example.com"))), None);
    }

    #[test]
    fn secure_prefix() {
        assert_eq!(unprefixed("__Secure-SID", &attrs(true, None, Some("example.com"))), Some("SID"));
        assert_eq!(unprefixed("__Secure-SID", &attrs(false, None, None)), None);
    }

    #[test]
    fn prefix_is_case_sensitive() {
        assert_eq!(unprefixed("__host-SID", &attrs(false, None, None)), Some("__host-SID"));
        assert_eq!(unprefixed("SID", &attrs(false, None, None)), Some("SID"));
    }
}
