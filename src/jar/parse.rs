use thiserror::Error;
use url::Url;

use crate::cookie::{parse_set_cookie, prefix, Cookie, SetCookie};
use crate::jar::{domain_matches, CookieJar};

/// Why a syntactically valid `Set-Cookie` value was not accepted.
#[derive(Debug, Error)]
enum Rejection {
    #[error("name prefix requirements not met")]
    Prefix,
    #[error("domain {0:?} does not include host {1:?}")]
    Domain(String, String),
    #[error("secure cookie set over {0}")]
    Insecure(String),
}

/// Applies the prefix rules, the origin checks against `uri` and the domain
/// normalization to a parsed `Set-Cookie` value.
fn accept(mut set_cookie: SetCookie, uri: Option<&Url>) -> Result<Cookie, Rejection> {
    let name = prefix::unprefixed(&set_cookie.name, &set_cookie.attributes)
        .ok_or(Rejection::Prefix)?
        .to_string();

    let attributes = &mut set_cookie.attributes;
    if let Some(uri) = uri {
        let host = uri.host_str().unwrap_or("");
        if let Some(ref domain) = attributes.domain {
            if !domain_matches(host, domain.trim_start_matches('.')) {
                return Err(Rejection::Domain(domain.clone(), host.into()));
            }
        }

        if attributes.secure && uri.scheme() != "https" {
            return Err(Rejection::Insecure(uri.scheme().into()));
        }
    }

    // A `Domain` always includes subdomains; without one the cookie belongs
    // to the responding host alone.
    attributes.domain = match attributes.domain.take() {
        Some(domain) => Some(format!(".{}", domain.trim_start_matches('.').to_ascii_lowercase())),
        None => uri.and_then(Url::host_str).map(String::from),
    };

    Ok(set_cookie.into_named_cookie(name))
}

impl CookieJar {
    /// Parses the values of `Set-Cookie` response headers into the list of
    /// cookies to apply to a jar, in header order.
    ///
    /// `uri` is the URL the response came from. When given, cookies are
    /// rejected if their `Domain` doesn't include its host, or if they are
    /// `Secure` and `uri` isn't `https`. A cookie without a `Domain` is bound
    /// to the host of `uri`; a `Domain` is normalized to apply to subdomains.
    ///
    /// Cookies named with a `__Host-` or `__Secure-` [prefix](crate::prefix)
    /// are rejected unless they carry the attributes the prefix requires, and
    /// are stored without the prefix otherwise.
    ///
    /// Rejected and malformed values are skipped. Removal cookies (empty
    /// values) are kept so that [`CookieJar::update()`] can act on them.
    ///
    /// # Example
    ///
    /// ```rust
    /// use url::Url;
    /// use webrest::CookieJar;
    ///
    /// let uri = Url::parse("https://www.example.com/").unwrap();
    /// let cookies = CookieJar::parse_cookies(vec![
    ///     "session=0x6100; Domain=example.com; Secure",
    ///     "__Host-lang=de; Path=/",
    ///     "theme=",
    /// ], Some(&uri));
    ///
    /// let names: Vec<_> = cookies.iter().map(|c| c.name_value()).collect();
    /// assert_eq!(names, vec![("session", Some("0x6100")), ("theme", None)]);
    /// assert_eq!(cookies[0].domain(), Some(".example.com"));
    /// assert_eq!(cookies[1].domain(), Some("www.example.com"));
    /// ```
    pub fn parse_cookies<I, S>(headers: I, uri: Option<&Url>) -> Vec<Cookie>
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        let mut cookies = Vec::new();
        for header in headers {
            let header = header.as_ref();
            let set_cookie = match parse_set_cookie(header) {
                Ok(set_cookie) => set_cookie,
                Err(e) => {
                    log::debug!("ignoring malformed Set-Cookie {:?}: {}", header, e);
                    continue;
                }
            };

            match accept(set_cookie, uri) {
                Ok(cookie) => cookies.push(cookie),
                Err(reason) => log::debug!("rejecting Set-Cookie {:?}: {}", header, reason),
            }
        }

        cookies
    }

    /// Parses the values of `Set-Cookie` response headers into a new jar.
    ///
    /// See [`CookieJar::parse_cookies()`] for the rules applied. Since the
    /// jar starts out empty, removal cookies have nothing to remove; use
    /// [`CookieJar::store()`] to apply a response to an existing jar.
    ///
    /// # Example
    ///
    /// ```rust
    /// use url::Url;
    /// use webrest::CookieJar;
    ///
    /// let uri = Url::parse("http://example.com/").unwrap();
    /// let jar = CookieJar::parse(vec!["session=0x6100", "lang=de; Secure"], Some(&uri));
    ///
    /// assert_eq!(jar.len(), 1);
    /// assert_eq!(jar.header_for(&uri, None).as_deref(), Some("session=0x6100"));
    /// ```
    pub fn parse<I, S>(headers: I, uri: Option<&Url>) -> CookieJar
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        CookieJar::new().merge(CookieJar::parse_cookies(headers, uri))
    }

    /// Applies the `Set-Cookie` header values of a response from `uri` to
    /// this jar, including removals.
    ///
    /// # Example
    ///
    /// ```rust
    /// use url::Url;
    /// use webrest::CookieJar;
    ///
    /// let uri = Url::parse("https://example.com/").unwrap();
    /// let mut jar = CookieJar::new();
    ///
    /// jar.store(vec!["session=0x6100"], &uri);
    /// assert!(jar.present());
    ///
    /// jar.store(vec!["session=; Max-Age=0"], &uri);
    /// assert!(!jar.present());
    /// ```
    pub fn store<I, S>(&mut self, headers: I, uri: &Url) -> &mut Self
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        self.update(CookieJar::parse_cookies(headers, Some(uri)))
    }
}
