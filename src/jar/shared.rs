use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use url::Url;

use crate::cookie::Cookie;
use crate::jar::{CookieJar, CookieUpdate, IntoUrl};

/// A [`CookieJar`] that can be shared between threads, for example by all
/// requests made through one client.
///
/// Cloning a `SharedCookieJar` yields a handle to the same jar. Reads return
/// owned data so no lock is held by the caller.
///
/// # Example
///
/// ```rust
/// use std::thread;
/// use webrest::SharedCookieJar;
///
/// let jar = SharedCookieJar::default();
/// let handle = jar.clone();
/// thread::spawn(move || {
///     handle.update(vec![("session", "0x6100")]);
/// }).join().unwrap();
///
/// assert_eq!(jar.header_for("https://example.com/", None).as_deref(), Some("session=0x6100"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedCookieJar {
    inner: Arc<RwLock<CookieJar>>,
}

impl SharedCookieJar {
    /// Wraps `jar` for sharing.
    pub fn new(jar: CookieJar) -> SharedCookieJar {
        SharedCookieJar { inner: Arc::new(RwLock::new(jar)) }
    }

    // Lock poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, CookieJar> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CookieJar> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`CookieJar::update()`].
    pub fn update<I>(&self, updates: I)
        where I: IntoIterator, I::Item: Into<CookieUpdate>
    {
        self.write().update(updates);
    }

    /// See [`CookieJar::store()`].
    pub fn store<I, S>(&self, headers: I, uri: &Url)
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        let cookies = CookieJar::parse_cookies(headers, Some(uri));
        self.write().update(cookies);
    }

    /// Removes every cookie.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// See [`CookieJar::present()`].
    pub fn present(&self) -> bool {
        self.read().present()
    }

    /// Returns copies of the cookies valid for `target` now. See
    /// [`CookieJar::valid_for()`].
    pub fn valid_for<U: IntoUrl>(&self, target: U) -> Vec<Cookie> {
        self.read().valid_for(target).cloned().collect()
    }

    /// See [`CookieJar::header_for()`].
    pub fn header_for<U: IntoUrl>(&self, target: U, existing: Option<&str>) -> Option<String> {
        self.read().header_for(target, existing)
    }

    /// Returns a copy of the jar as it is now.
    pub fn snapshot(&self) -> CookieJar {
        self.read().clone()
    }
}

impl From<CookieJar> for SharedCookieJar {
    fn from(jar: CookieJar) -> SharedCookieJar {
        SharedCookieJar::new(jar)
    }
}
