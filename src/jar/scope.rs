use std::cmp::Ordering;
use std::fmt;

use url::Url;

use crate::cookie::Cookie;

/// Which hosts a [`MatchKey`] applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum HostRule {
    /// Any host. Used for cookies without a `Domain`.
    Any,
    /// Exactly this host: a host-only cookie.
    Exact(String),
    /// This domain and all of its subdomains. Stored without the leading dot.
    Suffix(String),
}

/// The scope a cookie is filed under in a [`CookieJar`](crate::CookieJar):
/// the allowed schemes, the host rule and the path prefix.
///
/// Two cookies with the same name replace each other only when their match
/// keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MatchKey {
    secure: bool,
    host: HostRule,
    path: String,
}

impl MatchKey {
    /// The scope of cookies given only by name and value: `http` or `https`,
    /// any host, root path.
    pub fn any() -> MatchKey {
        MatchKey { secure: false, host: HostRule::Any, path: "/".into() }
    }

    pub fn of(cookie: &Cookie) -> MatchKey {
        let host = match cookie.domain() {
            Some(domain) if domain.starts_with('.') => {
                match domain.trim_start_matches('.') {
                    "" => HostRule::Any,
                    suffix => HostRule::Suffix(suffix.to_ascii_lowercase()),
                }
            }
            Some(domain) if !domain.is_empty() => HostRule::Exact(domain.to_ascii_lowercase()),
            _ => HostRule::Any,
        };

        let path = match cookie.path() {
            Some(path) if path.starts_with('/') => path.to_string(),
            _ => "/".to_string(),
        };

        MatchKey { secure: cookie.secure(), host, path }
    }

    /// Whether a request to the canonical `url` falls within this scope.
    pub fn matches(&self, url: &Url) -> bool {
        let scheme_ok = match url.scheme() {
            "https" => true,
            "http" => !self.secure,
            _ => false,
        };

        let host = url.host_str().unwrap_or("");
        let host_ok = match self.host {
            HostRule::Any => !host.is_empty(),
            HostRule::Exact(ref exact) => host == exact,
            HostRule::Suffix(ref domain) => domain_matches(host, domain),
        };

        scheme_ok && host_ok && path_matches(&self.path, url.path())
    }

    /// Orders more specific scopes first: longer paths, then exact hosts,
    /// then longer domains, then any host.
    pub fn cmp_specificity(&self, other: &MatchKey) -> Ordering {
        fn rank(host: &HostRule) -> (u8, usize) {
            match *host {
                HostRule::Exact(ref h) => (2, h.len()),
                HostRule::Suffix(ref d) => (1, d.len()),
                HostRule::Any => (0, 0),
            }
        }

        other.path.len().cmp(&self.path.len())
            .then_with(|| rank(&other.host).cmp(&rank(&self.host)))
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.secure { "https://" } else { "http(s)://" })?;
        match self.host {
            HostRule::Any => f.write_str("*")?,
            HostRule::Exact(ref host) => f.write_str(host)?,
            HostRule::Suffix(ref domain) => write!(f, "*.{}", domain)?,
        }

        f.write_str(&self.path)
    }
}

/// RFC 6265 §5.1.3 domain matching: `host` is `domain` or a subdomain of it.
/// `domain` carries no leading dot.
pub(crate) fn domain_matches(host: &str, domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    let host = host.as_bytes();
    let domain = domain.as_bytes();
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }

    host.len() > domain.len()
        && host[host.len() - domain.len()..].eq_ignore_ascii_case(domain)
        && host[host.len() - domain.len() - 1] == b'.'
}

/// RFC 6265 §5.1.4 path matching.
pub(crate) fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }

    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}
