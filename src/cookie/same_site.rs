use std::fmt;
use std::str::FromStr;

/// The `SameSite` cookie attribute.
///
/// A cookie with a `SameSite` attribute is imposed restrictions on when it is
/// sent to the origin server in a cross-site request. If the `SameSite`
/// attribute is "Strict", then the cookie is never sent in cross-site requests.
/// If the `SameSite` attribute is "Lax", the cookie is only sent in cross-site
/// requests with "safe" HTTP methods, i.e, `GET`, `HEAD`, `OPTIONS`, `TRACE`.
/// If the `SameSite` attribute is "None", the cookie is sent in all
/// cross-site requests.
///
/// The attribute is recorded and rendered; this crate does not act on it
/// when selecting cookies for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SameSite {
    /// The "Strict" `SameSite` attribute.
    Strict,
    /// The "Lax" `SameSite` attribute.
    Lax,
    /// The "None" `SameSite` attribute.
    None,
}

impl SameSite {
    /// Returns `true` if `self` is `SameSite::Strict` and `false` otherwise.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrest::SameSite;
    ///
    /// let strict = SameSite::Strict;
    /// assert!(strict.is_strict());
    /// assert!(!strict.is_lax());
    /// assert!(!strict.is_none());
    /// ```
    #[inline]
    pub fn is_strict(&self) -> bool {
        matches!(*self, SameSite::Strict)
    }

    /// Returns `true` if `self` is `SameSite::Lax` and `false` otherwise.
    #[inline]
    pub fn is_lax(&self) -> bool {
        matches!(*self, SameSite::Lax)
    }

    /// Returns `true` if `self` is `SameSite::None` and `false` otherwise.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(*self, SameSite::None)
    }
}

impl FromStr for SameSite {
    type Err = ();

    /// Case-insensitive match on `Strict`, `Lax` and `None`.
    fn from_str(s: &str) -> Result<SameSite, ()> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("strict") {
            Ok(SameSite::Strict)
        } else if s.eq_ignore_ascii_case("lax") {
            Ok(SameSite::Lax)
        } else if s.eq_ignore_ascii_case("none") {
            Ok(SameSite::None)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SameSite;

    #[test]
    fn parse() {
        assert_eq!("Strict".parse(), Ok(SameSite::Strict));
        assert_eq!("lax".parse(), Ok(SameSite::Lax));
        assert_eq!(" NONE ".parse(), Ok(SameSite::None));
        assert_eq!("sometimes".parse::<SameSite>(), Err(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(&SameSite::Lax, &[Token::UnitVariant { name: "SameSite", variant: "Lax" }]);
    }
}
